use std::io::Write;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::logging::log_config::{LogConfig, OutputFormat};
use crate::logging::log_level::LogLevel;
use crate::logging::sink::{LogContext, LogSink, SinkError, SinkResult};

/// 控制台输出的一条日志
#[derive(Debug, Clone, serde::Serialize)]
pub struct LogEntry<'a> {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: &'a str,
    #[serde(skip_serializing_if = "is_empty_context")]
    pub context: &'a LogContext,
}

impl<'a> LogEntry<'a> {
    pub fn new(level: LogLevel, message: &'a str, context: &'a LogContext) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message,
            context,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    fn to_text(&self, include_timestamp: bool) -> Result<String, serde_json::Error> {
        let mut line = String::new();
        if include_timestamp {
            line.push_str(&format!("[{}] ", self.timestamp.format("%Y-%m-%d %H:%M:%S")));
        }
        line.push_str(&format!("[{}] {}", self.level.as_str(), self.message));
        if !self.context.is_empty() {
            line.push(' ');
            line.push_str(&serde_json::to_string(self.context)?);
        }
        Ok(line)
    }
}

fn is_empty_context(context: &&LogContext) -> bool {
    context.is_empty()
}

/// 交互模式下的控制台日志目标
pub struct ConsoleSink {
    min_level: LogLevel,
    format: OutputFormat,
    include_timestamps: bool,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    pub fn stdout(config: &LogConfig) -> Self {
        Self::with_writer(config, Box::new(std::io::stdout()))
    }

    pub fn with_writer(config: &LogConfig, writer: Box<dyn Write + Send>) -> Self {
        Self {
            min_level: config.level,
            format: config.format,
            include_timestamps: config.include_timestamps,
            writer: Mutex::new(writer),
        }
    }

    pub fn level(&self) -> LogLevel {
        self.min_level
    }

    fn render(&self, entry: &LogEntry<'_>) -> Result<String, serde_json::Error> {
        match self.format {
            OutputFormat::Json => entry.to_json(),
            OutputFormat::Text => entry.to_text(self.include_timestamps),
        }
    }
}

impl LogSink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    fn log(&self, level: LogLevel, message: &str, context: &LogContext) -> SinkResult {
        if level < self.min_level {
            return Ok(());
        }

        let line = self.render(&LogEntry::new(level, message, context))?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| SinkError::Unavailable("console writer lock poisoned".to_string()))?;
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("min_level", &self.min_level)
            .field("format", &self.format)
            .finish()
    }
}
