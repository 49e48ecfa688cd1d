// gdpr-eraser - Entity anonymization engine
// Copyright (c) 2025 Eraser Contributors
// Licensed under the MIT License

use clap::Parser;
use gdpr_eraser::cli::{Cli, Commands};
use gdpr_eraser::config::{load_config, EraserConfig};
use gdpr_eraser::logging::init_logging;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Logging settings come from the config file when it loads; commands
    // report configuration errors themselves
    let config = load_config(&cli.config).unwrap_or_default();
    let log_level = cli
        .log_level
        .as_deref()
        .unwrap_or(config.application.log_level.as_str());
    let logging_guard = match init_logging(log_level, &logging_for(&cli, &config)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(2);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "gdpr-eraser - Entity anonymization engine"
    );

    // Create shutdown signal channel for graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Spawn signal handler task
    let shutdown_tx_clone = shutdown_tx.clone();
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
                    tracing::info!("Received SIGINT (Ctrl+C), cancelling pending requests...");
                    println!("\n⚠️  Shutdown signal received, cancelling pending requests...");
                    let _ = shutdown_tx_clone.send(true);
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, cancelling pending requests...");
                    println!("\n⚠️  Shutdown signal received, cancelling pending requests...");
                    let _ = shutdown_tx_clone.send(true);
                }
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            } else {
                tracing::info!("Received SIGINT (Ctrl+C), cancelling pending requests...");
                println!("\n⚠️  Shutdown signal received, cancelling pending requests...");
                let _ = shutdown_tx_clone.send(true);
            }
        }
    });

    // Execute command and get exit code
    let exit_code = match execute_command(&cli, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e:#}");
            1
        }
    };

    // process::exit skips destructors; flush file logs first
    drop(logging_guard);
    process::exit(exit_code);
}

/// File logging is only used by commands that touch entity data
fn logging_for(cli: &Cli, config: &EraserConfig) -> gdpr_eraser::config::LoggingConfig {
    let mut logging = config.logging.clone();
    if !matches!(cli.command, Commands::Anonymize(_)) {
        logging.local_enabled = false;
    }
    logging
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, shutdown_signal: watch::Receiver<bool>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Anonymize(args) => args.execute(&cli.config, shutdown_signal).await,
        Commands::ListProperties(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
