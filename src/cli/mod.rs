//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the eraser using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// gdpr-eraser - Entity anonymization engine
#[derive(Parser, Debug)]
#[command(name = "gdpr-eraser")]
#[command(version, about, long_about = None)]
#[command(author = "Eraser Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "gdpr-eraser.toml", env = "ERASER_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ERASER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize one or more entities in the configured store
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Show the effective anonymization registry
    ListProperties(commands::list::ListArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
