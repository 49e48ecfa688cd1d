//! Audit logger for anonymization requests

use crate::anonymization::models::AnonymizationOutcome;
use crate::anonymization::plan::Resolution;
use crate::anonymization::strategy::HashStrategy;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    entity_type: String,
    entity_id: String,
    applied_spec_count: usize,
    skipped_spec_count: usize,
    observer_failures: usize,
    dry_run: bool,
    processing_time_ms: u64,
    changes: Vec<AuditChange>,
}

/// One changed value (original hashed, never plaintext)
#[derive(Debug, Serialize)]
struct AuditChange {
    target: String,
    strategy: String,
    /// SHA-256 hash of original value
    original_hash: String,
}

/// Append-only audit trail of completed anonymization requests
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    enabled: bool,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(log_path: PathBuf, json_format: bool, enabled: bool) -> Result<Self> {
        if enabled {
            if let Some(parent) = log_path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create audit log directory: {}", parent.display())
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
            enabled,
        })
    }

    /// Path of the audit log
    pub fn log_path(&self) -> &PathBuf {
        &self.log_path
    }

    /// Record a completed request
    pub fn log_anonymization(
        &self,
        outcome: &AnonymizationOutcome,
        resolution: &Resolution,
    ) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let entry = AuditLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            entity_type: outcome.entity_type.to_string(),
            entity_id: outcome.entity_id.to_string(),
            applied_spec_count: outcome.applied_spec_count,
            skipped_spec_count: outcome.skipped_spec_count,
            observer_failures: outcome.observer_failures.len(),
            dry_run: outcome.dry_run,
            processing_time_ms: outcome.duration_ms,
            changes: resolution
                .changes
                .iter()
                .map(|change| AuditChange {
                    target: change.target.to_string(),
                    strategy: change.strategy.to_string(),
                    original_hash: hash_original(&change.original),
                })
                .collect(),
        };

        self.write_entry(&entry)
    }

    /// Write an audit entry to the log file
    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        if self.json_format {
            let json_line =
                serde_json::to_string(entry).context("Failed to serialize audit entry")?;
            writeln!(file, "{json_line}").context("Failed to write audit entry")?;
        } else {
            writeln!(
                file,
                "[{}] Entity: {}/{} | Applied: {} | Skipped: {} | Dry run: {} | Time: {}ms",
                entry.timestamp,
                entry.entity_type,
                entry.entity_id,
                entry.applied_spec_count,
                entry.skipped_spec_count,
                entry.dry_run,
                entry.processing_time_ms
            )
            .context("Failed to write audit entry")?;
        }

        Ok(())
    }
}

/// SHA-256 of a value's text form; strings hash their raw content
fn hash_original(value: &Value) -> String {
    match value {
        Value::String(s) => HashStrategy::digest(s),
        other => HashStrategy::digest(&other.to_string()),
    }
}
