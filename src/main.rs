// Holly API - ElevenLabs conversation webhook backend
// Copyright (c) 2025 Holly API Contributors
// Licensed under the MIT License

use clap::Parser;
use holly_api::cli::commands::EXIT_FATAL;
use holly_api::cli::{Cli, Commands};
use holly_api::config::{load_config_or_default, LoggingConfig};
use holly_api::logging::init_logging;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let command = cli.command();

    // The server logs per its configuration; other commands log to the
    // console only. Configuration errors are reported by the command itself.
    let (log_level, logging_config) = match load_config_or_default(&cli.config) {
        Ok(config) if command.is_serve() => (
            config.application.effective_log_level().to_string(),
            config.logging,
        ),
        Ok(config) => (
            config.application.effective_log_level().to_string(),
            LoggingConfig::default(),
        ),
        Err(_) => ("info".to_string(), LoggingConfig::default()),
    };
    let log_level = cli.log_level.clone().unwrap_or(log_level);

    let logging_guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Holly API - ElevenLabs conversation webhook backend"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create SIGTERM handler");
                    return;
                }
            };

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating graceful shutdown...");
                }
            }
            let _ = shutdown_tx.send(true);
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            } else {
                tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
                let _ = shutdown_tx.send(true);
            }
        }
    });

    let exit_code = match execute_command(&cli.config, command, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    // Flush file logs before exiting
    drop(logging_guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(
    config_path: &str,
    command: Commands,
    shutdown_signal: watch::Receiver<bool>,
) -> anyhow::Result<i32> {
    match command {
        Commands::Serve(args) => args.execute(config_path, shutdown_signal).await,
        Commands::ValidateConfig(args) => args.execute(config_path).await,
        Commands::Status(args) => args.execute(config_path).await,
        Commands::Init(args) => args.execute().await,
    }
}
