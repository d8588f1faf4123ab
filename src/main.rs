//! Homework Status Bot CLI
//!
//! 轮询 Practicum 作业状态并把变更发送到 Telegram chat

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use homework_status_bot::startup::{self, StartupError};
use homework_status_bot::{BotConfig, ConfigError, CycleOutcome};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "homework-bot")]
#[command(about = "Homework Status Bot - 轮询作业状态并推送到 Telegram")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 持续轮询（默认每 600 秒一次）
    Run(RunArgs),
    /// 只执行一轮后退出
    Once(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// 轮询间隔（秒）
    #[arg(long, short, default_value = "600")]
    interval: u64,
    /// HTTP 请求超时（秒）
    #[arg(long, default_value = "30")]
    timeout: u64,
    /// 作业状态 API 地址
    #[arg(long)]
    endpoint: Option<String>,
    /// Telegram Bot API 地址
    #[arg(long)]
    telegram_api: Option<String>,
    /// 初始游标（Unix 时间戳），默认当前时间
    #[arg(long)]
    from_date: Option<i64>,
    /// 从指定 env 文件读取凭据（默认读取当前目录的 .env）
    #[arg(long)]
    env_file: Option<PathBuf>,
}

fn load_config(args: &RunArgs) -> Result<BotConfig, ConfigError> {
    let config = match &args.env_file {
        Some(path) => BotConfig::from_env_file(path)?,
        None => {
            // .env 不存在也没关系
            dotenvy::dotenv().ok();
            BotConfig::from_env()?
        }
    };

    let mut config = config
        .with_retry_interval(Duration::from_secs(args.interval))?
        .with_request_timeout(args.timeout)?;
    if let Some(endpoint) = &args.endpoint {
        config = config.with_endpoint(endpoint);
    }
    if let Some(api) = &args.telegram_api {
        config = config.with_telegram_api(api);
    }
    Ok(config)
}

fn main() -> Result<()> {
    // 通过 RUST_LOG 环境变量控制日志级别
    // 例如: RUST_LOG=info homework-bot run
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("homework_status_bot=debug,homework_bot=debug"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    let cli = Cli::parse();
    let (args, once) = match cli.command {
        Commands::Run(args) => (args, false),
        Commands::Once(args) => (args, true),
    };

    info!("Starting homework status bot");

    let mut poll_loop = match startup::start(load_config(&args)) {
        Ok(poll_loop) => poll_loop,
        Err(StartupError::Config(e)) => {
            match &e {
                ConfigError::Missing(_) => {
                    error!(critical = true, error = %e, "Configuration is incomplete, shutting down")
                }
                _ => error!(critical = true, error = %e, "Configuration is invalid, shutting down"),
            }
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Cannot start homework status bot"),
    };
    if let Some(from_date) = args.from_date {
        poll_loop = poll_loop.with_cursor(from_date);
    }

    if once {
        match poll_loop.run_cycle() {
            CycleOutcome::Idle => println!("No changes since {}", poll_loop.cursor()),
            CycleOutcome::Processed { items, delivered } => {
                println!("Processed {} homework record(s), sent {} message(s)", items, delivered)
            }
            CycleOutcome::Faulted(e) => return Err(e.into()),
        }
        return Ok(());
    }

    poll_loop.run()
}
