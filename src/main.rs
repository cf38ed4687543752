use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::CommandFactory;
use ghost::cli::{parse_args, Cli};
use ghost::{common, workers};
use ghost_core::GhostError;
use ghost_worker::Worker;

fn main() -> ExitCode {
    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}\n\n{}", Cli::command().render_usage());
            return ExitCode::from(2);
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            // 启动阶段错误（配置、Worker、参数）与运行期错误区分退出码
            match e.downcast_ref::<GhostError>() {
                Some(err) if err.is_startup_error() => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.wants_help() {
        print!("{}", Cli::command().render_help());
        return Ok(());
    }

    let registry = workers::registry();

    if cli.list_workers {
        for name in registry.list_workers() {
            println!("{name}");
        }
        return Ok(());
    }

    let worker = common::prepare_worker(&cli, &registry)?;

    if cli.print_config {
        print!("{}", worker.configuration().to_toml()?);
        return Ok(());
    }

    // 后台化会fork进程，只能使用单线程运行时
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("创建tokio运行时失败")?;
    runtime.block_on(common::run_worker(&cli, worker))?;
    Ok(())
}
