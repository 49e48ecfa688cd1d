//! Configuration schema types
//!
//! This module defines the configuration structure of the eraser.

use crate::anonymization::config::{AnonymizationConfig, AuditConfig};
use crate::anonymization::models::EntityTypeSpecs;
use crate::anonymization::registry::PropertyRegistry;
use crate::domain::{EntityTypeKey, EraserError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main eraser configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EraserConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Request handling and strategy overrides
    #[serde(default)]
    pub anonymization: AnonymizationConfig,

    /// Host store backend
    #[serde(default)]
    pub store: StoreConfig,

    /// Audit trail
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Anonymizable properties and fields, keyed by entity type
    #[serde(default)]
    pub registry: BTreeMap<String, EntityTypeSpecs>,
}

impl EraserConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.anonymization
            .validate()
            .map_err(|e| format!("anonymization: {e}"))?;
        self.store.validate()?;
        self.audit.validate().map_err(|e| format!("audit: {e}"))?;
        self.logging.validate()?;
        self.build_registry().map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Seed a property registry from the `[registry.<type>]` tables
    ///
    /// # Errors
    ///
    /// Returns [`EraserError::Configuration`] for an invalid entity type key,
    /// the forbidden customer profile type or duplicate names.
    pub fn build_registry(&self) -> crate::domain::Result<PropertyRegistry> {
        let mut registry = PropertyRegistry::new();
        for (name, specs) in &self.registry {
            let key = EntityTypeKey::new(name.as_str()).map_err(EraserError::Configuration)?;
            registry.register_type(&key, specs.properties.clone())?;
            registry.register_fields(&key, specs.fields.clone())?;
        }
        Ok(registry)
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (run every phase but do not write to the store)
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Host store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// JSON document on disk
    #[default]
    JsonFile,
    /// Process-local map, starts empty
    Memory,
}

/// Host store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend
    #[serde(default)]
    pub kind: StoreKind,

    /// Path of the JSON store file
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::default(),
            path: default_store_path(),
        }
    }
}

impl StoreConfig {
    fn validate(&self) -> Result<(), String> {
        if self.kind == StoreKind::JsonFile && self.path.as_os_str().is_empty() {
            return Err("store.path is required when store.kind = 'json_file'".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "minutely", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path is required when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./data/entities.json")
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
