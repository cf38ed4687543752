use std::fmt;
use std::str::FromStr;

/// Log severity, ordered from least to most severe
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Detailed debug information
    Debug = 0,
    /// Interesting events
    Info = 1,
    /// Normal but significant events
    Notice = 2,
    /// Exceptional occurrences that are not errors
    Warning = 3,
    /// Runtime errors that do not require immediate action
    Error = 4,
    /// Critical conditions
    Critical = 5,
    /// Action must be taken immediately
    Alert = 6,
    /// System is unusable
    Emergency = 7,
}

impl LogLevel {
    pub const ALL: [LogLevel; 8] = [
        LogLevel::Emergency,
        LogLevel::Alert,
        LogLevel::Critical,
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Notice,
        LogLevel::Info,
        LogLevel::Debug,
    ];

    /// Get current log level from environment variable
    pub fn from_env() -> Self {
        std::env::var("GHOST_LOG_LEVEL")
            .map(|s| s.parse().unwrap_or(Self::Info))
            .unwrap_or(Self::Info)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Notice => "NOTICE",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
            LogLevel::Alert => "ALERT",
            LogLevel::Emergency => "EMERGENCY",
        }
    }

    /// Closest `tracing` filter directive for this severity
    pub fn as_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info | LogLevel::Notice => "info",
            LogLevel::Warning => "warn",
            _ => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = crate::errors::GhostError;

    fn from_str(level: &str) -> Result<Self, Self::Err> {
        match level.to_lowercase().as_str() {
            "debug" | "trace" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "notice" => Ok(LogLevel::Notice),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" | "err" => Ok(LogLevel::Error),
            "critical" | "crit" => Ok(LogLevel::Critical),
            "alert" => Ok(LogLevel::Alert),
            "emergency" | "emerg" => Ok(LogLevel::Emergency),
            _ => Err(crate::errors::GhostError::Configuration(format!(
                "Invalid log level: {level}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered_by_severity() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warning < LogLevel::Error);
        assert!(LogLevel::Alert < LogLevel::Emergency);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!("CRIT".parse::<LogLevel>().unwrap(), LogLevel::Critical);
        assert_eq!("emerg".parse::<LogLevel>().unwrap(), LogLevel::Emergency);
        assert!("loud".parse::<LogLevel>().is_err());
    }
}
