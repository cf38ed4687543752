use crate::logging::log_level::LogLevel;
use crate::logging::sink::{LogContext, LogSink, SinkResult};

pub const DAEMON_LOG_TARGET: &str = "ghost::daemon";

/// 守护进程日志设施
///
/// 把日志转交给 `tracing`，由进程启动时安装的订阅者（文件、journald）
/// 负责落盘。上下文以JSON附在消息末尾。
#[derive(Debug, Default, Clone, Copy)]
pub struct DaemonLogSink;

impl DaemonLogSink {
    pub fn new() -> Self {
        Self
    }

    pub fn render(message: &str, context: &LogContext) -> Result<String, serde_json::Error> {
        if context.is_empty() {
            return Ok(message.to_string());
        }
        Ok(format!("{message} [{}]", serde_json::to_string(context)?))
    }
}

impl LogSink for DaemonLogSink {
    fn name(&self) -> &str {
        "daemon"
    }

    fn log(&self, level: LogLevel, message: &str, context: &LogContext) -> SinkResult {
        let line = Self::render(message, context)?;
        let severity = level.as_str();
        match level {
            LogLevel::Emergency | LogLevel::Alert | LogLevel::Critical | LogLevel::Error => {
                tracing::error!(target: DAEMON_LOG_TARGET, severity, "{line}")
            }
            LogLevel::Warning => tracing::warn!(target: DAEMON_LOG_TARGET, severity, "{line}"),
            LogLevel::Notice | LogLevel::Info => {
                tracing::info!(target: DAEMON_LOG_TARGET, severity, "{line}")
            }
            LogLevel::Debug => tracing::debug!(target: DAEMON_LOG_TARGET, severity, "{line}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_context;

    #[test]
    fn test_render_without_context() {
        assert_eq!(
            DaemonLogSink::render("started", &LogContext::new()).unwrap(),
            "started"
        );
    }

    #[test]
    fn test_render_appends_context() {
        let line = DaemonLogSink::render("stalling", &log_context! { "seconds" => 4 }).unwrap();
        assert_eq!(line, "stalling [{\"seconds\":4}]");
    }

    #[test]
    fn test_every_level_is_accepted() {
        let sink = DaemonLogSink::new();
        for level in LogLevel::ALL {
            assert!(sink.log(level, "message", &LogContext::new()).is_ok());
        }
    }
}
