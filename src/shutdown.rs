use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use ghost_worker::DaemonController;
use tokio::signal;
use tracing::{error, info};

/// 等待关闭信号，返回收到的信号名称
pub async fn wait_for_shutdown_signal() -> Result<&'static str> {
    let ctrl_c = async { signal::ctrl_c().await.context("安装Ctrl+C信号处理器失败") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("安装SIGTERM信号处理器失败")?
            .recv()
            .await;
        Ok::<(), anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        result = ctrl_c => result.map(|_| "SIGINT"),
        result = terminate => result.map(|_| "SIGTERM"),
    }
}

/// `signal` 完成后请求守护进程停止
///
/// 停止请求会中断当前的等待，主循环在本轮结束后退出并执行 `shutdown` 钩子。
pub async fn stop_daemon_on<F>(signal: F, daemon: Arc<dyn DaemonController>)
where
    F: Future<Output = Result<&'static str>>,
{
    match signal.await {
        Ok(name) => {
            info!("收到{name}信号，开始优雅关闭");
            daemon.stop();
        }
        Err(e) => {
            error!("信号监听失败，只能通过Worker自身停止: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghost_worker::SystemDaemon;

    #[tokio::test]
    async fn test_signal_stops_daemon() {
        let daemon = Arc::new(SystemDaemon::new());
        stop_daemon_on(async { Ok::<_, anyhow::Error>("SIGTERM") }, daemon.clone()).await;
        assert!(daemon.is_dying());
    }

    #[tokio::test]
    async fn test_listener_failure_leaves_daemon_running() {
        let daemon = Arc::new(SystemDaemon::new());
        stop_daemon_on(
            async { Err::<&'static str, _>(anyhow::anyhow!("no signals here")) },
            daemon.clone(),
        )
        .await;
        assert!(!daemon.is_dying());
    }
}
