//! In-memory log sinks for unit and integration tests

use std::sync::{Mutex, PoisonError};

use super::log_level::LogLevel;
use super::sink::{LogContext, LogSink, SinkError, SinkResult};

#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub context: LogContext,
}

/// Mock sink that keeps every delivered record
#[derive(Debug)]
pub struct RecordingSink {
    name: String,
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl LogSink for RecordingSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn log(&self, level: LogLevel, message: &str, context: &LogContext) -> SinkResult {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).push(LogRecord {
            level,
            message: message.to_string(),
            context: context.clone(),
        });
        Ok(())
    }
}

/// Mock sink that rejects every record
#[derive(Debug, Default)]
pub struct FailingSink;

impl LogSink for FailingSink {
    fn name(&self) -> &str {
        "failing"
    }

    fn log(&self, _level: LogLevel, _message: &str, _context: &LogContext) -> SinkResult {
        Err(SinkError::Unavailable("failing sink".to_string()))
    }
}
