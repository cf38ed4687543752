use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use ghost_core::logging::DAEMON_LOG_TARGET;
use ghost_core::{
    ConfigLoader, ConsoleSink, DaemonLogSink, LogConfig, LogSink, MultiLogger, OutputFormat,
};
use ghost_worker::{
    DaemonController, EngineOptions, LifecycleEngine, RunSummary, SystemDaemon, Worker,
    WorkerRegistry,
};
use tracing::{info, warn};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::cli::Cli;
use crate::shutdown;

/// 初始化日志系统
///
/// - 宿主自身的诊断输出写到stderr（后台化后stderr即日志文件）
/// - `ghost::daemon` 目标的Worker日志写入日志文件，并可选写入journald
pub fn init_logging(config: &LogConfig, syslog_identifier: &str) -> Result<()> {
    config.validate().map_err(anyhow::Error::msg)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_filter_directive()));

    let stderr_layer = match config.format {
        OutputFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(filter_fn(|meta| meta.target() != DAEMON_LOG_TARGET))
            .boxed(),
        OutputFormat::Text => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(filter_fn(|meta| meta.target() != DAEMON_LOG_TARGET))
            .boxed(),
    };

    let mut file_error = None;
    let file_layer = match config.log_file_path.as_deref().map(open_log_file) {
        Some(Ok(file)) => Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(filter_fn(|meta| meta.target() == DAEMON_LOG_TARGET)),
        ),
        Some(Err(e)) => {
            file_error = Some(e);
            None
        }
        None => None,
    };

    let journald_layer = if config.journald {
        let layer = tracing_journald::layer()
            .context("连接systemd journal失败")?
            .with_syslog_identifier(syslog_identifier.to_string());
        Some(layer.with_filter(filter_fn(|meta| meta.target() == DAEMON_LOG_TARGET)))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .with(journald_layer)
        .try_init()
        .context("初始化日志系统失败")?;

    if let Some(e) = file_error {
        warn!("无法打开日志文件，Worker日志不会写入文件: {e:#}");
    }
    Ok(())
}

fn open_log_file(path: &str) -> Result<std::fs::File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("创建日志目录失败: {}", parent.display()))?;
        }
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("打开日志文件失败: {path}"))
}

/// 日志配置：环境变量为基础，命令行参数覆盖
pub fn log_config(cli: &Cli, worker: &dyn Worker) -> LogConfig {
    let mut config = LogConfig::from_env();
    if let Some(level) = cli.log_level {
        config.level = level;
    }
    if let Some(format) = cli.log_format {
        config.format = format;
    }
    config.journald |= cli.journald;
    config.with_log_file(worker.configuration().log_location())
}

/// 构造Worker并叠加外部配置和Worker参数
pub fn prepare_worker(cli: &Cli, registry: &WorkerRegistry) -> Result<Box<dyn Worker>> {
    let worker_type = cli.worker_type()?;
    let mut worker = registry.resolve(worker_type)?;

    let configuration = ConfigLoader::load(cli.config.as_deref(), worker.configuration())
        .context("加载Worker配置失败")?;
    let base = worker.base_mut();
    base.set_configuration(configuration);
    base.set_arguments(cli.worker_arguments());

    Ok(worker)
}

/// 日志目标：守护进程日志总是挂载，控制台只在前台运行时挂载
pub fn build_sinks(log_config: &LogConfig, foreground: bool) -> MultiLogger {
    let mut sinks = MultiLogger::new();
    if foreground {
        sinks.attach(Arc::new(ConsoleSink::stdout(log_config)) as Arc<dyn LogSink>);
    }
    sinks.attach(Arc::new(DaemonLogSink::new()) as Arc<dyn LogSink>);
    sinks
}

/// 运行Worker直到其失效或收到停止信号
pub async fn run_worker(cli: &Cli, worker: Box<dyn Worker>) -> Result<RunSummary> {
    let log_config = log_config(cli, worker.as_ref());
    init_logging(&log_config, worker.configuration().sanitized_app_name())?;

    let options = EngineOptions {
        flags: cli.flags(),
        no_daemon: cli.no_daemon,
        app_dir: std::env::current_dir().ok(),
    };
    let foreground = options.flags.is_foreground() || options.no_daemon;

    info!(
        worker = worker.name(),
        config = cli.config.as_deref().unwrap_or("-"),
        foreground,
        "启动Worker宿主"
    );

    let controller: Arc<dyn DaemonController> = Arc::new(SystemDaemon::new());
    tokio::spawn(shutdown::stop_daemon_on(
        shutdown::wait_for_shutdown_signal(),
        Arc::clone(&controller),
    ));

    let sinks = build_sinks(&log_config, foreground);
    let mut engine = LifecycleEngine::new(worker, sinks, controller, options);
    let summary = engine.run().await?;

    info!(
        worker = %summary.worker,
        uuid = %summary.uuid,
        iterations = summary.iterations,
        stop_reason = ?summary.stop_reason,
        "Worker宿主已退出"
    );
    Ok(summary)
}
