//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use anyhow::Context;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "gdpr-eraser.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing gdpr-eraser configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        fs::write(&self.output, config_content)
            .with_context(|| format!("Failed to write configuration file {}", self.output))?;

        println!("✅ Configuration file created: {}", self.output);
        println!();
        println!("Next steps:");
        println!("  1. Edit {} and list the properties to anonymize", self.output);
        println!("  2. Point [store] at your entity data");
        println!("  3. Validate configuration: gdpr-eraser validate-config");
        println!("  4. Preview a request: gdpr-eraser anonymize -t user --id 42 --dry-run");
        println!();
        Ok(0)
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# gdpr-eraser Configuration File

[application]
log_level = "info"
dry_run = false

[anonymization]
request_timeout_seconds = 30

[store]
kind = "json_file"
path = "./data/entities.json"

[audit]
enabled = true
log_path = "./audit/anonymization.log"
json_format = true

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"

[registry.user]
properties = [
    { name = "mail", strategy = "hash" },
    { name = "name", strategy = "randomize" },
]
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# gdpr-eraser Configuration File
#
# This file contains all configuration options with examples and explanations.
# Values of the form ${VAR} are read from the environment (or a .env file).
# Any key can also be overridden with ERASER_<SECTION>_<KEY>.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode (run every phase but never write to the store)
dry_run = false

# ============================================================================
# Anonymization Settings
# ============================================================================
[anonymization]
# Per-request deadline in seconds (1-3600)
request_timeout_seconds = 30

# Strategy overrides, applied to the registry after it is seeded.
# Overrides may only retype or add properties; the customer profile type
# (commerce_customer_profile) can never be targeted.
[[anonymization.overrides]]
entity_type = "user"
property = "mail"
strategy = "clear"

# ============================================================================
# Host Store
# ============================================================================
[store]
# Backend: "json_file" or "memory"
kind = "json_file"

# JSON store location
path = "${ERASER_DATA_DIR}/entities.json"

# ============================================================================
# Audit Trail
# ============================================================================
[audit]
# Record every completed request. Original values are stored as SHA-256 only.
enabled = true
log_path = "./audit/anonymization.log"

# JSON lines (true) or plain text (false)
json_format = true

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = true

# Local log directory
local_path = "./logs"

# Log rotation (daily, hourly, minutely, never)
local_rotation = "daily"

# ============================================================================
# Anonymization Registry
# ============================================================================
# One table per entity type. Order is preserved and determines the order in
# which values are anonymized.
#
# Strategies:
#   clear      - replace with the empty value of the same type
#   hash       - replace with the SHA-256 hex digest of the original
#   randomize  - replace with a generated value of the same kind
#   generalize - replace with a coarser value (dates become the year)
#   skip       - leave the value untouched
[registry.user]
properties = [
    { name = "mail", strategy = "hash" },
    { name = "name", strategy = "randomize" },
    { name = "init", strategy = "clear" },
]
fields = [
    { name = "field_birthdate", strategy = "generalize" },
    { name = "field_phone", strategy = "clear", scope = "multivalue" },
]

[registry.commerce_order]
properties = [
    { name = "mail", strategy = "hash" },
    { name = "hostname", strategy = "clear" },
]
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EraserConfig;
    use tempfile::TempDir;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "gdpr-eraser.toml".to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "gdpr-eraser.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_generate_minimal_config_parses() {
        let content = InitArgs::generate_minimal_config();
        let config: EraserConfig = toml::from_str(&content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.registry["user"].properties.len(), 2);
    }

    #[test]
    fn test_generate_config_with_examples_parses() {
        let content = InitArgs::generate_config_with_examples()
            .replace("${ERASER_DATA_DIR}", "./data");
        let config: EraserConfig = toml::from_str(&content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.anonymization.overrides.len(), 1);
        assert_eq!(config.registry["user"].fields.len(), 2);
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("gdpr-eraser.toml");
        fs::write(&output, "# existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().into_owned(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), "# existing");

        let forced = InitArgs { force: true, ..args };
        assert_eq!(forced.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&output).unwrap().contains("[registry.user]"));
    }
}
