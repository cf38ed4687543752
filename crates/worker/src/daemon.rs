use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use daemonize::Daemonize;
use ghost_core::{DaemonOptions, GhostError, GhostResult};
use tokio::sync::Notify;
use tracing::{debug, info, warn};

/// 守护进程控制器
///
/// 生命周期引擎只通过该接口进行后台化和等待，便于在测试中替换。
#[async_trait]
pub trait DaemonController: Send + Sync {
    /// 保存选项；每次运行都会调用，无论是否后台化
    fn configure(&self, options: DaemonOptions) -> GhostResult<()>;

    /// 脱离终端并写入PID文件
    fn start(&self) -> GhostResult<()>;

    /// 请求停止，可重复调用
    fn stop(&self);

    /// 阻塞等待 `wait`，`stop()` 会提前唤醒
    async fn iterate(&self, wait: Duration);

    fn is_dying(&self) -> bool;
}

/// 基于 `daemonize` 的系统守护进程
///
/// `start()` 会fork进程，必须在多线程运行时启动之前调用（即在单线程运行时中）。
#[derive(Debug, Default)]
pub struct SystemDaemon {
    options: Mutex<Option<DaemonOptions>>,
    dying: AtomicBool,
    started: AtomicBool,
    wakeup: Notify,
}

impl SystemDaemon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(&self) -> Option<DaemonOptions> {
        self.options.lock().ok().and_then(|options| options.clone())
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    fn ensure_parent_dir(path: &str) -> GhostResult<()> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    fn remove_pid_file(options: &DaemonOptions) {
        match fs::remove_file(&options.pid_location) {
            Ok(()) => debug!(pid_file = %options.pid_location, "PID文件已删除"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(pid_file = %options.pid_location, error = %e, "删除PID文件失败"),
        }
    }
}

#[async_trait]
impl DaemonController for SystemDaemon {
    fn configure(&self, options: DaemonOptions) -> GhostResult<()> {
        debug!(app = %options.sanitized_app_name, "配置守护进程选项");
        let mut current = self
            .options
            .lock()
            .map_err(|_| GhostError::Daemon("守护进程选项锁已损坏".to_string()))?;
        *current = Some(options);
        Ok(())
    }

    fn start(&self) -> GhostResult<()> {
        let options = self
            .options()
            .ok_or_else(|| GhostError::Daemon("启动前必须先配置守护进程".to_string()))?;

        Self::ensure_parent_dir(&options.pid_location)?;
        Self::ensure_parent_dir(&options.log_location)?;

        let stdout = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&options.log_location)?;
        let stderr = stdout.try_clone()?;

        let working_directory = options
            .app_dir
            .clone()
            .unwrap_or_else(|| Path::new("/").to_path_buf());

        let mut daemonize = Daemonize::new()
            .pid_file(&options.pid_location)
            .chown_pid_file(true)
            .working_directory(working_directory)
            .stdout(stdout)
            .stderr(stderr);
        if let Some(uid) = options.run_as_uid {
            daemonize = daemonize.user(uid);
        }
        if let Some(gid) = options.run_as_gid {
            daemonize = daemonize.group(gid);
        }

        daemonize
            .start()
            .map_err(|e| GhostError::Daemon(format!("后台化失败: {e}")))?;

        self.started.store(true, Ordering::SeqCst);
        info!(
            app = %options.app_name,
            pid = std::process::id(),
            pid_file = %options.pid_location,
            "守护进程已启动"
        );
        Ok(())
    }

    fn stop(&self) {
        if self.dying.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("守护进程正在停止");
        self.wakeup.notify_waiters();

        if self.is_started() {
            if let Some(options) = self.options() {
                Self::remove_pid_file(&options);
            }
        }
    }

    async fn iterate(&self, wait: Duration) {
        let notified = self.wakeup.notified();
        if self.is_dying() {
            return;
        }
        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = notified => {
                debug!("等待被停止请求中断");
            }
        }
    }

    fn is_dying(&self) -> bool {
        self.dying.load(Ordering::SeqCst)
    }
}
