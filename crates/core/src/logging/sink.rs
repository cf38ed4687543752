use thiserror::Error;

use super::log_level::LogLevel;

/// 日志上下文，键值对会原样传递给每个日志目标
pub type LogContext = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("写入日志失败: {0}")]
    Write(#[from] std::io::Error),
    #[error("序列化日志上下文失败: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("日志目标不可用: {0}")]
    Unavailable(String),
}

pub type SinkResult = Result<(), SinkError>;

/// 单个日志目标（控制台、守护进程日志设施等）
pub trait LogSink: Send + Sync {
    fn name(&self) -> &str;

    fn log(&self, level: LogLevel, message: &str, context: &LogContext) -> SinkResult;

    fn emergency(&self, message: &str, context: &LogContext) -> SinkResult {
        self.log(LogLevel::Emergency, message, context)
    }
    fn alert(&self, message: &str, context: &LogContext) -> SinkResult {
        self.log(LogLevel::Alert, message, context)
    }
    fn critical(&self, message: &str, context: &LogContext) -> SinkResult {
        self.log(LogLevel::Critical, message, context)
    }
    fn error(&self, message: &str, context: &LogContext) -> SinkResult {
        self.log(LogLevel::Error, message, context)
    }
    fn warning(&self, message: &str, context: &LogContext) -> SinkResult {
        self.log(LogLevel::Warning, message, context)
    }
    fn notice(&self, message: &str, context: &LogContext) -> SinkResult {
        self.log(LogLevel::Notice, message, context)
    }
    fn info(&self, message: &str, context: &LogContext) -> SinkResult {
        self.log(LogLevel::Info, message, context)
    }
    fn debug(&self, message: &str, context: &LogContext) -> SinkResult {
        self.log(LogLevel::Debug, message, context)
    }
}

/// 面向调用方的日志接口
///
/// 与 [`LogSink`] 不同，`Logger` 不会向调用方返回错误：单个目标的失败
/// 由实现自行处理。
pub trait Logger: Send + Sync {
    fn log(&self, level: LogLevel, message: &str, context: LogContext);

    fn emergency(&self, message: &str, context: LogContext) {
        self.log(LogLevel::Emergency, message, context)
    }
    fn alert(&self, message: &str, context: LogContext) {
        self.log(LogLevel::Alert, message, context)
    }
    fn critical(&self, message: &str, context: LogContext) {
        self.log(LogLevel::Critical, message, context)
    }
    fn error(&self, message: &str, context: LogContext) {
        self.log(LogLevel::Error, message, context)
    }
    fn warning(&self, message: &str, context: LogContext) {
        self.log(LogLevel::Warning, message, context)
    }
    fn notice(&self, message: &str, context: LogContext) {
        self.log(LogLevel::Notice, message, context)
    }
    fn info(&self, message: &str, context: LogContext) {
        self.log(LogLevel::Info, message, context)
    }
    fn debug(&self, message: &str, context: LogContext) {
        self.log(LogLevel::Debug, message, context)
    }
}

/// 构造 [`LogContext`]
///
/// ```
/// let context = ghost_core::log_context! { "iteration" => 3, "signal" => "stall" };
/// assert_eq!(context["iteration"], 3);
/// ```
#[macro_export]
macro_rules! log_context {
    () => {
        $crate::logging::LogContext::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut context = $crate::logging::LogContext::new();
        $(
            context.insert(($key).to_string(), $crate::serde_json::json!($value));
        )+
        context
    }};
}
