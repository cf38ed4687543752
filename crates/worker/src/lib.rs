pub mod daemon;
pub mod iteration_stats;
pub mod lifecycle;
pub mod registry;
pub mod signal;
pub mod worker;

pub use daemon::{DaemonController, SystemDaemon};
pub use iteration_stats::IterationStats;
pub use lifecycle::{EngineOptions, IterationReport, LifecycleEngine, RunSummary, StopReason};
pub use registry::{WorkerFactory, WorkerRegistry};
pub use signal::Signal;
pub use worker::{Worker, WorkerBase, WorkerFlags};
