//! Anonymization configuration

use crate::anonymization::models::StrategyKind;
use crate::domain::EntityTypeKey;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Upper bound for the per-request timeout
const MAX_REQUEST_TIMEOUT_SECONDS: u64 = 3600;

/// Strategy override applied by the built-in alter callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyOverride {
    /// Entity type the property belongs to
    pub entity_type: EntityTypeKey,

    /// Property to add or retype
    pub property: String,

    /// New strategy
    pub strategy: StrategyKind,
}

/// Request handling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Deadline for one anonymization request
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// Strategy overrides, applied in order after the registry is seeded
    #[serde(default)]
    pub overrides: Vec<StrategyOverride>,
}

fn default_request_timeout_seconds() -> u64 {
    30
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: default_request_timeout_seconds(),
            overrides: Vec::new(),
        }
    }
}

impl AnonymizationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_seconds == 0 {
            anyhow::bail!("request_timeout_seconds must be greater than 0");
        }
        if self.request_timeout_seconds > MAX_REQUEST_TIMEOUT_SECONDS {
            anyhow::bail!(
                "request_timeout_seconds must be at most {MAX_REQUEST_TIMEOUT_SECONDS}, got {}",
                self.request_timeout_seconds
            );
        }

        for entry in &self.overrides {
            if entry.entity_type.is_forbidden() {
                anyhow::bail!(
                    "Strategy override targets forbidden entity type '{}'",
                    entry.entity_type
                );
            }
            if entry.property.trim().is_empty() {
                anyhow::bail!(
                    "Strategy override for '{}' has an empty property name",
                    entry.entity_type
                );
            }
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("ERASER_ANONYMIZATION_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = val
                .parse()
                .context("Invalid ERASER_ANONYMIZATION_REQUEST_TIMEOUT_SECONDS value")?;
        }

        Ok(())
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON format for audit logs
    #[serde(default = "default_audit_json_format")]
    pub json_format: bool,
}

fn default_audit_enabled() -> bool {
    true
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/anonymization.log")
}

fn default_audit_json_format() -> bool {
    true
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            log_path: default_audit_log_path(),
            json_format: default_audit_json_format(),
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            anyhow::bail!("audit.log_path cannot be empty when audit logging is enabled");
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("ERASER_AUDIT_ENABLED") {
            self.enabled = val.parse().context("Invalid ERASER_AUDIT_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("ERASER_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("ERASER_AUDIT_JSON_FORMAT") {
            self.json_format = val
                .parse()
                .context("Invalid ERASER_AUDIT_JSON_FORMAT value")?;
        }

        Ok(())
    }
}
