use std::sync::Arc;

use super::log_level::LogLevel;
use super::sink::{LogContext, LogSink, Logger};

/// 日志扇出：把每条日志广播给所有已挂载的目标
#[derive(Clone, Default)]
pub struct MultiLogger {
    sinks: Vec<Arc<dyn LogSink>>,
}

impl MultiLogger {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<Arc<dyn LogSink>>) -> Self {
        let mut logger = Self::new();
        for sink in sinks {
            logger.attach(sink);
        }
        logger
    }

    /// 挂载日志目标；同一个实例重复挂载会被忽略
    pub fn attach(&mut self, sink: Arc<dyn LogSink>) {
        let already_attached = self
            .sinks
            .iter()
            .any(|existing| std::ptr::addr_eq(Arc::as_ptr(existing), Arc::as_ptr(&sink)));
        if !already_attached {
            self.sinks.push(sink);
        }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn sink_names(&self) -> Vec<String> {
        self.sinks.iter().map(|s| s.name().to_string()).collect()
    }

    /// 按挂载顺序投递，单个目标失败不影响其余目标
    pub fn broadcast(&self, level: LogLevel, message: &str, context: &LogContext) {
        for sink in &self.sinks {
            if let Err(e) = sink.log(level, message, context) {
                tracing::warn!(sink = sink.name(), error = %e, "log sink failed to deliver message");
            }
        }
    }
}

impl Logger for MultiLogger {
    fn log(&self, level: LogLevel, message: &str, context: LogContext) {
        self.broadcast(level, message, &context);
    }
}

impl std::fmt::Debug for MultiLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiLogger")
            .field("sinks", &self.sink_names())
            .finish()
    }
}
