use crate::logging::log_level::LogLevel;

/// Logging configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LogConfig {
    /// Minimum level rendered by the console sink
    pub level: LogLevel,
    /// Output format for console and tracing output
    pub format: OutputFormat,
    /// Whether to include timestamps in console output
    pub include_timestamps: bool,
    /// Whether daemon logs go to journald
    pub journald: bool,
    /// Log file used once the process is detached
    pub log_file_path: Option<String>,
}

/// Output format for log entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text format
    Text,
    /// One JSON object per line
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = crate::errors::GhostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(crate::errors::GhostError::Configuration(format!(
                "Invalid output format: {s}. Valid formats: text, json"
            ))),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: OutputFormat::Text,
            include_timestamps: true,
            journald: false,
            log_file_path: None,
        }
    }
}

impl LogConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.level = LogLevel::from_env();

        if let Ok(format_str) = std::env::var("GHOST_LOG_FORMAT") {
            config.format = format_str.parse().unwrap_or(OutputFormat::Text);
        }

        if let Ok(journald) = std::env::var("GHOST_LOG_JOURNALD") {
            config.journald = journald.to_lowercase() == "true";
        }

        if let Ok(include_timestamps) = std::env::var("GHOST_LOG_TIMESTAMPS") {
            config.include_timestamps = include_timestamps.to_lowercase() == "true";
        }

        config
    }

    pub fn with_level(level: LogLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_log_file(mut self, path: impl Into<String>) -> Self {
        self.log_file_path = Some(path.into());
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(path) = &self.log_file_path {
            if path.trim().is_empty() {
                return Err("Log file path must not be empty".to_string());
            }
        }
        Ok(())
    }
}
