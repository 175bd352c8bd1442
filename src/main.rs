//! slactac - chat sidebar label overrides
//!
//! Main entry point for the slactac CLI.

mod cli;
mod cmd_config;
mod cmd_simulate;
mod cmd_tack;

use std::path::Path;

use clap::Parser;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use slactac_config::{Config, ConfigLoader};

use crate::cli::{Cli, Commands};

/// Initialize tracing with console and file output.
///
/// Log files are written to `<data dir>/logs` with daily rotation.
fn init_tracing(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = config.storage.data_dir.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("slactac")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the writer flushing for the life of the process.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    Ok(ConfigLoader::load_or_default(path)?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    init_tracing(&config)?;

    match cli.command {
        Commands::Tack { action } => cmd_tack::handle_tack_command(action, &config).await,
        Commands::Simulate { fixture, pick } => {
            cmd_simulate::simulate(&fixture, pick.as_deref(), &config).await
        }
        Commands::CheckConfig => cmd_config::check_config(&cli.config, &config),
    }
}
