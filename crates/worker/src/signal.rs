use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use ghost_core::GhostError;

/// `execute()` 的返回信号，决定本轮迭代之后的等待时间
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    /// 短暂等待后继续
    #[default]
    Continue,
    /// 等待 stall time
    Stall,
    /// 等待 sleep time
    Sleep,
    /// 停止守护进程
    Die,
}

impl Signal {
    /// 每轮迭代的默认等待时间
    pub const DEFAULT_WAIT: Duration = Duration::from_secs(2);

    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Continue => "continue",
            Signal::Stall => "stall",
            Signal::Sleep => "sleep",
            Signal::Die => "die",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Signal {
    type Err = GhostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "continue" => Ok(Signal::Continue),
            "stall" => Ok(Signal::Stall),
            "sleep" => Ok(Signal::Sleep),
            "die" => Ok(Signal::Die),
            _ => Err(GhostError::UnknownSignal(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_signals() {
        assert_eq!("continue".parse::<Signal>().unwrap(), Signal::Continue);
        assert_eq!("Stall".parse::<Signal>().unwrap(), Signal::Stall);
        assert_eq!(" SLEEP ".parse::<Signal>().unwrap(), Signal::Sleep);
        assert_eq!("die".parse::<Signal>().unwrap(), Signal::Die);
    }

    #[test]
    fn test_unknown_signal_is_rejected() {
        let err = "hibernate".parse::<Signal>().unwrap_err();
        assert!(matches!(err, GhostError::UnknownSignal(ref s) if s == "hibernate"));
    }

    #[test]
    fn test_display_round_trips() {
        for signal in [Signal::Continue, Signal::Stall, Signal::Sleep, Signal::Die] {
            assert_eq!(signal.to_string().parse::<Signal>().unwrap(), signal);
        }
    }
}
