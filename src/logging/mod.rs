//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels
//! - Human-readable console output
//! - JSON log files with rotation
//!
//! # Example
//!
//! ```no_run
//! use gdpr_eraser::logging::init_logging;
//! use gdpr_eraser::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of an anonymization request
///
/// # Example
///
/// ```no_run
/// use gdpr_eraser::log_anonymization_start;
/// use gdpr_eraser::domain::{EntityId, EntityTypeKey};
///
/// let entity_type = EntityTypeKey::new("user").unwrap();
/// let entity_id = EntityId::from(42);
/// log_anonymization_start!(&entity_type, &entity_id);
/// ```
#[macro_export]
macro_rules! log_anonymization_start {
    ($entity_type:expr, $entity_id:expr) => {
        tracing::info!(
            entity_type = %$entity_type,
            entity_id = %$entity_id,
            "Starting anonymization"
        );
    };
}

/// Log the completion of an anonymization request
#[macro_export]
macro_rules! log_anonymization_complete {
    ($outcome:expr) => {
        tracing::info!(
            entity_type = %$outcome.entity_type,
            entity_id = %$outcome.entity_id,
            applied = $outcome.applied_spec_count,
            skipped = $outcome.skipped_spec_count,
            observer_failures = $outcome.observer_failures.len(),
            dry_run = $outcome.dry_run,
            duration_ms = $outcome.duration_ms,
            "Anonymization completed"
        );
    };
}

/// Log an orchestrator phase transition
#[macro_export]
macro_rules! log_phase_transition {
    ($entity_type:expr, $entity_id:expr, $phase:expr) => {
        tracing::debug!(
            entity_type = %$entity_type,
            entity_id = %$entity_id,
            phase = %$phase,
            "Phase transition"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use gdpr_eraser::log_error_with_context;
/// use gdpr_eraser::domain::EraserError;
///
/// let error = EraserError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            kind = $error.kind(),
            context = $context,
            "Error occurred"
        );
    };
}

/// Log batch progress
#[macro_export]
macro_rules! log_batch_processing {
    ($current:expr, $total:expr) => {
        tracing::debug!(
            current = $current,
            total = $total,
            progress_pct = ($current as f64 / $total as f64 * 100.0),
            "Processing batch"
        );
    };
}
