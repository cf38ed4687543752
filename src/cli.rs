use std::collections::HashMap;
use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::Parser;
use ghost_core::{GhostError, GhostResult, LogLevel, OutputFormat};
use ghost_worker::WorkerFlags;

/// Ghost - 长驻后台Worker宿主
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ghost",
    version,
    about = "运行一个长驻的后台Worker",
    long_about = None,
    disable_help_flag = true
)]
pub struct Cli {
    /// 要运行的Worker名称
    #[arg(
        short,
        long,
        value_name = "WORKER",
        required_unless_present_any = ["list_workers", "help"]
    )]
    pub worker: Option<String>,

    /// 显示帮助信息（同时指定 `--worker` 时忽略）
    #[arg(short, long)]
    pub help: bool,

    /// 只在前台运行（不启动守护进程）
    #[arg(long)]
    pub no_daemon: bool,

    /// 以交互模式运行Worker
    #[arg(short, long)]
    pub interactive: bool,

    /// 以测试模式运行Worker
    #[arg(long)]
    pub test: bool,

    /// 配置文件路径（TOML）
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// 日志级别
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// 日志格式: text, json
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<OutputFormat>,

    /// 同时写入 systemd journal
    #[arg(long)]
    pub journald: bool,

    /// 传递给Worker的参数，可重复
    #[arg(short = 'a', long = "arg", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub arguments: Vec<(String, String)>,

    /// 列出所有可用的Worker
    #[arg(long)]
    pub list_workers: bool,

    /// 打印生效的Worker配置（TOML）后退出
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// 只有未指定Worker时 `--help` 才生效
    pub fn wants_help(&self) -> bool {
        self.help && self.worker.is_none()
    }

    pub fn flags(&self) -> WorkerFlags {
        WorkerFlags {
            interactive: self.interactive,
            test: self.test,
        }
    }

    pub fn worker_arguments(&self) -> HashMap<String, String> {
        self.arguments.iter().cloned().collect()
    }

    pub fn worker_type(&self) -> GhostResult<&str> {
        self.worker
            .as_deref()
            .ok_or_else(|| GhostError::missing_argument("--worker"))
    }
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("无效的参数 \"{s}\"，应为 KEY=VALUE"))?;
    if key.is_empty() {
        return Err(format!("无效的参数 \"{s}\"，键不能为空"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// 解析命令行参数
///
/// 缺少 `--worker` 时返回 `MissingArgument`；`--version` 以及其余解析错误由
/// clap直接输出并退出进程。`--help` 交给调用方通过 [`Cli::wants_help`] 处理。
pub fn parse_args<I, T>(args: I) -> GhostResult<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).or_else(|e| match e.kind() {
        ErrorKind::MissingRequiredArgument => Err(GhostError::missing_argument("--worker")),
        _ => e.exit(),
    })
}
