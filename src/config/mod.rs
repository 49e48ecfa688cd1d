//! Configuration management for the eraser.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for optional settings
//! - `ERASER_<SECTION>_<KEY>` environment overrides
//! - Validation on load, including the seeded registry
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level and dry-run mode
//! - [`AnonymizationConfig`] - request timeout and strategy overrides
//! - [`StoreConfig`] - host store backend
//! - [`AuditConfig`] - audit trail
//! - [`LoggingConfig`] - log files
//! - `[registry.<type>]` - anonymizable properties and fields
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [store]
//! kind = "json_file"
//! path = "${ERASER_DATA_DIR}/entities.json"
//!
//! [registry.user]
//! properties = [
//!     { name = "mail", strategy = "hash" },
//!     { name = "name", strategy = "randomize" },
//! ]
//!
//! [[anonymization.overrides]]
//! entity_type = "user"
//! property = "mail"
//! strategy = "clear"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use crate::anonymization::config::{AnonymizationConfig, AuditConfig, StrategyOverride};
pub use loader::load_config;
pub use schema::{ApplicationConfig, EraserConfig, LoggingConfig, StoreConfig, StoreKind};
