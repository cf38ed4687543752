pub mod loader;
pub mod worker_config;

pub use loader::ConfigLoader;
pub use worker_config::{
    sanitize_app_name, DaemonOptions, WorkerConfiguration, WorkerConfigurationBuilder,
    WorkerSettings,
};
