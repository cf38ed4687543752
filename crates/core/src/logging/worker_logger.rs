use std::sync::Arc;

use super::log_level::LogLevel;
use super::multi_logger::MultiLogger;
use super::sink::{LogContext, Logger};
use crate::identity::WorkerIdentity;

pub const WORKER_CONTEXT_KEY: &str = "worker";

/// 带Worker身份的日志器
///
/// 在转发给 [`MultiLogger`] 之前，向上下文注入 `worker: {name, UUID}`。
/// 调用方已经提供 `worker` 键时保持原值不变。
#[derive(Debug, Clone)]
pub struct WorkerLogger {
    sinks: MultiLogger,
    identity: Arc<WorkerIdentity>,
}

impl WorkerLogger {
    pub fn new(sinks: MultiLogger, identity: Arc<WorkerIdentity>) -> Self {
        Self { sinks, identity }
    }

    pub fn identity(&self) -> &WorkerIdentity {
        &self.identity
    }

    pub fn sinks(&self) -> &MultiLogger {
        &self.sinks
    }

    fn enrich(&self, context: &mut LogContext) {
        if !context.contains_key(WORKER_CONTEXT_KEY) {
            context.insert(
                WORKER_CONTEXT_KEY.to_string(),
                self.identity.to_context_value(),
            );
        }
    }
}

impl Logger for WorkerLogger {
    fn log(&self, level: LogLevel, message: &str, mut context: LogContext) {
        self.enrich(&mut context);
        self.sinks.broadcast(level, message, &context);
    }
}
