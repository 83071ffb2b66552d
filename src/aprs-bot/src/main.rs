// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

use aprs_app::{init_logging, install_panic_hook, notify_crash, AppConfig, ConfigFile};
use aprs_core::DynResult;
use aprs_demo_handlers::LoggingNotifier;

const PKG_DESCRIPTION: &str = concat!(env!("CARGO_PKG_NAME"), " - APRS-IS messaging bot");

#[derive(Debug, Parser)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = PKG_DESCRIPTION,
)]
struct Cli {
    /// Path to configuration file
    #[arg(long = "configfile", short = 'c', value_name = "FILE")]
    configfile: PathBuf,
    /// Override the configured log level (trace, debug, info, warn, error)
    #[arg(long = "log-level", value_name = "LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if !cli.configfile.exists() {
        eprintln!("configuration file not found: {}", cli.configfile.display());
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("aprs-bot exited with an error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> DynResult<()> {
    let cfg = AppConfig::load_from_file(&cli.configfile)?;

    init_logging(cli.log_level.as_deref());
    info!("loaded configuration from {}", cli.configfile.display());

    let nohup_path = cfg
        .crash_handler
        .nohup_filename
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("aprs-bot-crash.gz"));
    install_panic_hook(nohup_path.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("shutdown requested, disconnecting...");
            let _ = shutdown_tx.send(true);
        }
    });

    aprs_bot::run(cfg.clone(), shutdown_rx).await?;

    let apprise_config_file = cfg.crash_handler.apprise_config_file.as_ref().map(PathBuf::from);
    notify_crash(
        &LoggingNotifier,
        &nohup_path,
        apprise_config_file.as_deref(),
        "aprs-bot crashed",
    )
    .await;

    Ok(())
}
