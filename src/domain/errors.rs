//! Domain error types
//!
//! This module defines the error hierarchy for the eraser. Every anonymization
//! request terminates either in a successful outcome or in exactly one of these
//! error kinds. Errors carry owned strings only, so they are `Clone` and can be
//! shared between coalesced requests for the same entity.

use thiserror::Error;

/// Main eraser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EraserError {
    /// Invalid registry entry, forbidden entity type or invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An alter callback failed while the registry was being built
    #[error("Registry alter error: {callback} failed: {message}")]
    RegistryAlter { callback: String, message: String },

    /// A strategy received a value it cannot transform
    #[error("Strategy error: {0}")]
    Strategy(String),

    /// The field data adapter failed to commit
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// The request timed out or was cancelled before persisting
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// The host entity store has no such entity
    #[error("Entity not found: {entity_type}/{entity_id}")]
    EntityNotFound {
        entity_type: String,
        entity_id: String,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl EraserError {
    /// Stable snake_case label used in logs, audit records and CLI output
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration_error",
            Self::RegistryAlter { .. } => "registry_alter_error",
            Self::Strategy(_) => "strategy_error",
            Self::Persistence(_) => "persistence_error",
            Self::Timeout(_) => "timeout_error",
            Self::EntityNotFound { .. } => "entity_not_found",
            Self::Io(_) => "io_error",
            Self::Serialization(_) => "serialization_error",
        }
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) => 2,
            Self::RegistryAlter { .. } => 3,
            Self::Strategy(_) => 4,
            Self::Persistence(_) => 5,
            Self::Timeout(_) => 6,
            Self::EntityNotFound { .. } => 7,
            Self::Io(_) | Self::Serialization(_) => 1,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for EraserError {
    fn from(err: std::io::Error) -> Self {
        EraserError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for EraserError {
    fn from(err: serde_json::Error) -> Self {
        EraserError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for EraserError {
    fn from(err: toml::de::Error) -> Self {
        EraserError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EraserError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");

        let err = EraserError::RegistryAlter {
            callback: "third".to_string(),
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Registry alter error: third failed: boom");
    }

    #[test]
    fn test_kind_labels_are_distinct() {
        let errors = [
            EraserError::Configuration(String::new()),
            EraserError::RegistryAlter {
                callback: String::new(),
                message: String::new(),
            },
            EraserError::Strategy(String::new()),
            EraserError::Persistence(String::new()),
            EraserError::Timeout(String::new()),
            EraserError::EntityNotFound {
                entity_type: String::new(),
                entity_id: String::new(),
            },
            EraserError::Io(String::new()),
            EraserError::Serialization(String::new()),
        ];
        let mut kinds: Vec<_> = errors.iter().map(EraserError::kind).collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), errors.len());
    }

    #[test]
    fn test_exit_codes_are_non_zero() {
        assert_eq!(EraserError::Configuration(String::new()).exit_code(), 2);
        assert_eq!(EraserError::Persistence(String::new()).exit_code(), 5);
        assert_eq!(EraserError::Timeout(String::new()).exit_code(), 6);
        assert_ne!(EraserError::Io(String::new()).exit_code(), 0);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: EraserError = io_err.into();
        assert!(matches!(err, EraserError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: EraserError = json_err.into();
        assert!(matches!(err, EraserError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: EraserError = toml_err.into();
        assert!(matches!(err, EraserError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_errors_are_cloneable() {
        let err = EraserError::Persistence("disk full".to_string());
        assert_eq!(err.clone(), err);
    }
}
