pub mod config;
pub mod errors;
pub mod identity;
pub mod logging;

pub use crate::config::*;
pub use crate::errors::*;
pub use identity::WorkerIdentity;
pub use logging::{
    ConsoleSink, DaemonLogSink, LogConfig, LogContext, LogLevel, LogSink, Logger, MultiLogger,
    OutputFormat, WorkerLogger,
};

#[doc(hidden)]
pub use serde_json;
