use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use ghost_core::{
    log_context, GhostError, GhostResult, LogContext, Logger, MultiLogger, WorkerLogger,
};
use uuid::Uuid;

use crate::daemon::DaemonController;
use crate::iteration_stats::IterationStats;
use crate::registry::WorkerRegistry;
use crate::signal::Signal;
use crate::worker::{Worker, WorkerFlags};

/// 引擎运行选项
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub flags: WorkerFlags,
    /// 对应 `--no-daemon`
    pub no_daemon: bool,
    /// 守护进程的工作目录
    pub app_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// `is_valid()` 返回了 `false`
    WorkerInvalid,
    /// 守护进程收到停止请求（Die信号或外部信号）
    DaemonStopped,
}

/// 一次完整运行的结果
#[derive(Debug, Clone, serde::Serialize)]
pub struct RunSummary {
    pub worker: String,
    pub uuid: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// 累计迭代次数，不受统计重置影响
    pub iterations: u64,
    pub daemonized: bool,
    pub stop_reason: StopReason,
}

/// 单轮迭代的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationReport {
    pub iteration: u32,
    pub signal: Signal,
    pub elapsed: Duration,
    pub wait: Duration,
    /// 本轮结束时迭代统计被重置
    pub reset: bool,
}

/// Worker生命周期引擎
///
/// 驱动 `start_up → (wake → execute → sleep → wait)* → shutdown`，直到Worker
/// 失效或守护进程进入停止状态。所有状态变化都通过 [`WorkerLogger`] 记录。
pub struct LifecycleEngine {
    worker: Box<dyn Worker>,
    logger: Arc<WorkerLogger>,
    daemon: Arc<dyn DaemonController>,
    options: EngineOptions,
    stats: IterationStats,
}

impl LifecycleEngine {
    pub fn new(
        worker: Box<dyn Worker>,
        sinks: MultiLogger,
        daemon: Arc<dyn DaemonController>,
        options: EngineOptions,
    ) -> Self {
        let logger = Arc::new(WorkerLogger::new(sinks, worker.identity()));
        Self {
            worker,
            logger,
            daemon,
            options,
            stats: IterationStats::new(),
        }
    }

    /// 按类型名称从注册表构造Worker
    pub fn resolve(
        registry: &WorkerRegistry,
        worker_type: &str,
        sinks: MultiLogger,
        daemon: Arc<dyn DaemonController>,
        options: EngineOptions,
    ) -> GhostResult<Self> {
        let worker = registry.resolve(worker_type)?;
        Ok(Self::new(worker, sinks, daemon, options))
    }

    pub fn worker(&self) -> &dyn Worker {
        self.worker.as_ref()
    }

    pub fn logger(&self) -> &Arc<WorkerLogger> {
        &self.logger
    }

    pub fn stats(&self) -> &IterationStats {
        &self.stats
    }

    pub fn should_daemonize(&self) -> bool {
        !self.options.flags.is_foreground() && !self.options.no_daemon
    }

    pub async fn run(&mut self) -> GhostResult<RunSummary> {
        self.worker.init(self.options.flags, Arc::clone(&self.logger));

        let mut daemon_options = self.worker.configuration().to_daemon_options();
        if let Some(app_dir) = &self.options.app_dir {
            daemon_options = daemon_options.with_app_dir(app_dir.clone());
        }
        self.daemon.configure(daemon_options)?;

        let daemonized = self.should_daemonize();
        if daemonized {
            self.daemon.start()?;
        }

        let name = self.worker.name().to_string();
        let uuid = self.worker.uuid();

        self.logger.info(
            &format!("Starting worker \"{name}\" with UUID: {uuid}."),
            log_context! { "daemonized" => daemonized },
        );
        let started_at = Utc::now();
        self.worker
            .start_up()
            .await
            .map_err(|e| self.hook_failed("start_up", e))?;
        // start_up 可能修改了配置中的名称
        let name = self.worker.name().to_string();
        self.logger.info(
            &format!("Worker \"{name}\" started successfully."),
            LogContext::new(),
        );

        let mut iterations = 0u64;
        while !self.daemon.is_dying() && self.worker.is_valid() {
            self.iterate().await?;
            iterations += 1;
        }

        let stop_reason = if self.daemon.is_dying() {
            StopReason::DaemonStopped
        } else {
            StopReason::WorkerInvalid
        };

        self.logger.info(
            &format!("Worker \"{name}\" shutting down."),
            log_context! { "iterations" => iterations },
        );
        self.worker
            .shutdown()
            .await
            .map_err(|e| self.hook_failed("shutdown", e))?;
        self.logger.info(
            &format!("Worker \"{name}\" shut down successfully."),
            LogContext::new(),
        );
        self.daemon.stop();

        Ok(RunSummary {
            worker: name,
            uuid,
            started_at,
            finished_at: Utc::now(),
            iterations,
            daemonized,
            stop_reason,
        })
    }

    /// 执行一轮迭代
    pub async fn iterate(&mut self) -> GhostResult<IterationReport> {
        let iteration = self.stats.begin();
        let started = Instant::now();
        let name = self.worker.name().to_string();

        self.logger.info(
            &format!("Worker \"{name}\" waking up."),
            log_context! { "iteration" => iteration },
        );
        self.worker
            .wake()
            .await
            .map_err(|e| self.hook_failed("wake", e))?;
        self.logger.info(
            &format!("Worker \"{name}\" woke up successfully."),
            LogContext::new(),
        );

        let mut wait = Signal::DEFAULT_WAIT;

        self.logger.info(
            &format!("Worker \"{name}\" beginning iteration #{iteration}."),
            LogContext::new(),
        );
        let signal = self
            .worker
            .execute()
            .await
            .map_err(|e| self.hook_failed("execute", e))?;
        match signal {
            Signal::Continue => wait = Signal::DEFAULT_WAIT,
            Signal::Stall => wait = self.worker.stall_time(),
            Signal::Sleep => wait = self.worker.sleep_time(),
            Signal::Die => self.daemon.stop(),
        }

        let elapsed = started.elapsed();
        self.stats.record(iteration, elapsed);
        self.logger.info(
            &format!(
                "Worker \"{name}\" iteration #{iteration} completed in {:.6} seconds.",
                elapsed.as_secs_f64()
            ),
            log_context! { "signal" => signal.as_str() },
        );

        let reset = self.stats.is_exhausted(self.worker.max_iteration_count());
        if reset {
            wait = self.worker.sleep_time();
            self.logger.debug(
                &format!(
                    "Worker \"{name}\" completed {} iterations in {:.6} seconds.",
                    self.stats.recorded(),
                    self.stats.total().as_secs_f64()
                ),
                LogContext::new(),
            );
            self.stats.reset();
        }

        self.logger.info(
            &format!("Worker \"{name}\" sleeping for {} seconds.", wait.as_secs_f64()),
            LogContext::new(),
        );
        self.worker
            .sleep()
            .await
            .map_err(|e| self.hook_failed("sleep", e))?;
        self.logger.info(
            &format!("Worker \"{name}\" put to sleep successfully."),
            LogContext::new(),
        );

        self.daemon.iterate(wait).await;

        Ok(IterationReport {
            iteration,
            signal,
            elapsed,
            wait,
            reset,
        })
    }

    fn hook_failed(&self, hook: &'static str, cause: anyhow::Error) -> GhostError {
        self.logger.error(
            &format!("Worker \"{}\" failed in {hook}.", self.worker.name()),
            log_context! { "hook" => hook, "error" => format!("{cause:#}") },
        );
        GhostError::hook_failed(hook, cause)
    }
}

impl std::fmt::Debug for LifecycleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleEngine")
            .field("worker", &self.worker.name())
            .field("options", &self.options)
            .field("stats", &self.stats)
            .finish()
    }
}
