//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the eraser configuration file.

use crate::config::{load_config, StoreKind};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(e.exit_code());
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!(
            "  Request Timeout: {}s",
            config.anonymization.request_timeout_seconds
        );
        match config.store.kind {
            StoreKind::JsonFile => {
                println!("  Store: json_file ({})", config.store.path.display())
            }
            StoreKind::Memory => println!("  Store: memory"),
        }
        if config.audit.enabled {
            println!("  Audit Log: {}", config.audit.log_path.display());
        } else {
            println!("  Audit Log: disabled");
        }
        println!("  Entity Types: {}", config.registry.len());
        for (entity_type, specs) in &config.registry {
            println!(
                "    {entity_type}: {} properties, {} fields",
                specs.properties.len(),
                specs.fields.len()
            );
        }
        println!("  Strategy Overrides: {}", config.anonymization.overrides.len());
        println!();
        Ok(0)
    }
}
