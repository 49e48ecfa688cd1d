//! Error context extension trait
//!
//! Works like `anyhow::Context` but keeps the [`EraserError`] kind, so a
//! persistence failure stays a persistence failure once context is added.
//!
//! # Examples
//!
//! ```rust
//! use gdpr_eraser::domain::Result;
//! use gdpr_eraser::domain::context::ResultExt;
//!
//! fn read_store(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_context(|| format!("Failed to read store file {path}"))
//! }
//! ```

use crate::domain::errors::EraserError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation)
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<EraserError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| prefix(e.into(), &context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| prefix(e.into(), &f()))
    }
}

fn prefix(error: EraserError, context: &dyn std::fmt::Display) -> EraserError {
    match error {
        EraserError::Configuration(m) => EraserError::Configuration(format!("{context}: {m}")),
        EraserError::Strategy(m) => EraserError::Strategy(format!("{context}: {m}")),
        EraserError::Persistence(m) => EraserError::Persistence(format!("{context}: {m}")),
        EraserError::Timeout(m) => EraserError::Timeout(format!("{context}: {m}")),
        EraserError::Io(m) => EraserError::Io(format!("{context}: {m}")),
        EraserError::Serialization(m) => EraserError::Serialization(format!("{context}: {m}")),
        EraserError::RegistryAlter { callback, message } => EraserError::RegistryAlter {
            callback,
            message: format!("{context}: {message}"),
        },
        // Structured variants stay as they are
        not_found @ EraserError::EntityNotFound { .. } => not_found,
    }
}
