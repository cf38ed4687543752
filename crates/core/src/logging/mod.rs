pub mod console_sink;
pub mod daemon_sink;
pub mod log_config;
pub mod log_level;
pub mod multi_logger;
pub mod sink;
pub mod testing;
pub mod worker_logger;

pub use console_sink::ConsoleSink;
pub use daemon_sink::{DaemonLogSink, DAEMON_LOG_TARGET};
pub use log_config::{LogConfig, OutputFormat};
pub use log_level::LogLevel;
pub use multi_logger::MultiLogger;
pub use sink::{LogContext, LogSink, Logger, SinkError, SinkResult};
pub use worker_logger::{WorkerLogger, WORKER_CONTEXT_KEY};
