use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Ghost错误类型定义
#[derive(Debug, Error)]
pub enum GhostError {
    #[error("配置错误: {0}")]
    Configuration(String),

    #[error("Worker未找到: {worker}")]
    WorkerNotFound {
        worker: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("缺少必需参数: {0}")]
    MissingArgument(String),

    #[error("无法识别的信号: {0}")]
    UnknownSignal(String),

    #[error("守护进程错误: {0}")]
    Daemon(String),

    #[error("Worker钩子 {hook} 执行失败")]
    Hook {
        hook: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
}

impl GhostError {
    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }
    pub fn worker_not_found<S: Into<String>>(worker: S) -> Self {
        Self::WorkerNotFound {
            worker: worker.into(),
            source: None,
        }
    }
    /// 构造失败时保留原始错误
    pub fn worker_construction_failed<S: Into<String>>(worker: S, cause: anyhow::Error) -> Self {
        Self::WorkerNotFound {
            worker: worker.into(),
            source: Some(cause.into()),
        }
    }
    pub fn missing_argument<S: Into<String>>(name: S) -> Self {
        Self::MissingArgument(name.into())
    }
    pub fn hook_failed(hook: &'static str, cause: anyhow::Error) -> Self {
        Self::Hook {
            hook,
            source: cause.into(),
        }
    }
    /// 启动阶段的错误都不可恢复
    pub fn is_startup_error(&self) -> bool {
        matches!(
            self,
            GhostError::Configuration(_)
                | GhostError::WorkerNotFound { .. }
                | GhostError::MissingArgument(_)
        )
    }
}

impl From<config::ConfigError> for GhostError {
    fn from(err: config::ConfigError) -> Self {
        GhostError::Configuration(err.to_string())
    }
}

/// 统一的Result类型
pub type GhostResult<T> = std::result::Result<T, GhostError>;
