//! Waypoint CLI - command-line frontend for a Waypoint API server

mod commands;
mod config;
mod logging;
mod state_dir;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::Commands;
use state_dir::StateDir;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, error, info};
use waypoint_frontend_common::{AppContext, AppStore, FileStorage};

#[derive(Parser)]
#[command(name = "waypoint")]
#[command(about = "Sign in to a Waypoint API server and manage its users")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "info")]
    log_level: LogLevel,

    /// Directory for the stored session, config and logs
    #[arg(short = 'd', long, global = true)]
    data_dir: Option<PathBuf>,

    /// Configuration file (TOML or YAML)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// API base URL, overriding the configuration
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Disable file logging (only log to stderr)
    #[arg(long, global = true)]
    no_file_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dirs = StateDir::new(cli.data_dir.clone());

    logging::init_logging(cli.log_level.into(), &dirs.data_dir(), cli.no_file_log)?;

    let mut runtime_config =
        config::load_runtime_config(cli.config.as_deref(), &dirs.config_dir())?;
    if let Some(api_base) = cli.api_base {
        runtime_config.api_base = api_base;
    }

    let storage = Arc::new(FileStorage::new(dirs.session_file()));
    let ctx = AppContext::new(runtime_config, storage)?;
    ctx.start().await;

    let result = cli.command.execute(&ctx).await;
    report_notification(ctx.app());

    match result {
        Ok(()) => {
            info!("Command completed successfully");
        }
        Err(e) => {
            error!("Command failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Print the notification left by the command, if any
fn report_notification(app: &AppStore) {
    let notification = app.notification();
    if notification.show {
        eprintln!("[{}] {}", notification.kind, notification.message);
        app.hide_notification();
    }
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
