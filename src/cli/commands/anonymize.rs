//! Anonymize command implementation
//!
//! This module implements the `anonymize` command, which anonymizes one or
//! more entities of a type in the configured host store.

use crate::adapters::create_store;
use crate::anonymization::engine::Anonymizer;
use crate::anonymization::models::AnonymizationOutcome;
use crate::config::load_config;
use crate::domain::{EntityId, EntityTypeKey, Result};
use crate::{log_batch_processing, log_error_with_context};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// Entity type to anonymize (e.g. "user")
    #[arg(short = 't', long)]
    pub entity_type: String,

    /// Entity ID(s) to anonymize (comma-separated)
    #[arg(short, long = "id", value_delimiter = ',', required = true)]
    pub ids: Vec<String>,

    /// Dry run mode - run every phase without writing to the store
    #[arg(long)]
    pub dry_run: bool,

    /// Override the per-request timeout
    #[arg(long, value_name = "SECONDS")]
    pub timeout_seconds: Option<u64>,
}

impl AnonymizeArgs {
    /// Execute the anonymize command
    pub async fn execute(
        &self,
        config_path: &str,
        mut shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(
            entity_type = %self.entity_type,
            ids = ?self.ids,
            "Starting anonymize command"
        );

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(e.exit_code());
            }
        };

        // Apply CLI overrides
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
        if let Some(seconds) = self.timeout_seconds {
            tracing::info!(timeout_seconds = seconds, "Overriding request timeout from CLI");
            config.anonymization.request_timeout_seconds = seconds;
        }
        if let Err(e) = config.validate() {
            eprintln!("❌ Configuration validation failed: {e}");
            return Ok(2);
        }

        let (entity_type, entity_ids) = match self.parse_targets() {
            Ok(targets) => targets,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(e.exit_code());
            }
        };

        let engine = match create_store(&config.store)
            .await
            .and_then(|store| Anonymizer::from_config(&config, store))
        {
            Ok(engine) => engine,
            Err(e) => {
                log_error_with_context!(e, "Failed to initialize anonymizer");
                eprintln!("❌ Failed to initialize anonymizer: {e}");
                return Ok(e.exit_code());
            }
        };

        if config.application.dry_run {
            println!("🔍 DRY RUN MODE - No data will be written to the store");
            println!();
        }

        println!(
            "🚀 Anonymizing {} {} entit{}...",
            entity_ids.len(),
            entity_type,
            if entity_ids.len() == 1 { "y" } else { "ies" }
        );
        println!();

        let results = tokio::select! {
            results = engine.anonymize_batch(&entity_type, &entity_ids) => results,
            Ok(_) = shutdown_signal.wait_for(|stop| *stop) => {
                println!();
                println!(
                    "⚠️  Anonymization interrupted. Entities already committed stay anonymized."
                );
                return Ok(130); // SIGINT exit code
            }
        };

        Ok(report(&entity_type, &entity_ids, &results))
    }

    fn parse_targets(&self) -> Result<(EntityTypeKey, Vec<EntityId>)> {
        use crate::domain::EraserError;

        let entity_type = EntityTypeKey::new(self.entity_type.trim())
            .map_err(EraserError::Configuration)?;
        let entity_ids = self
            .ids
            .iter()
            .map(|id| EntityId::new(id.trim()).map_err(EraserError::Configuration))
            .collect::<Result<Vec<_>>>()?;
        Ok((entity_type, entity_ids))
    }
}

/// Print one line per request plus a summary; returns the exit code
fn report(
    entity_type: &EntityTypeKey,
    entity_ids: &[EntityId],
    results: &[Result<AnonymizationOutcome>],
) -> i32 {
    let mut exit_code = 0;
    let mut succeeded = 0;

    for (index, (entity_id, result)) in entity_ids.iter().zip(results).enumerate() {
        log_batch_processing!(index + 1, entity_ids.len());
        match result {
            Ok(outcome) => {
                succeeded += 1;
                println!(
                    "✅ {entity_type}/{entity_id}: {} applied, {} skipped ({}ms){}",
                    outcome.applied_spec_count,
                    outcome.skipped_spec_count,
                    outcome.duration_ms,
                    if outcome.dry_run { " [dry run]" } else { "" }
                );
                for failure in &outcome.observer_failures {
                    println!("   ⚠️  Observer failed: {failure}");
                }
            }
            Err(e) => {
                println!("❌ {entity_type}/{entity_id}: {e} [{}]", e.kind());
                if exit_code == 0 {
                    exit_code = e.exit_code();
                }
            }
        }
    }

    println!();
    println!("📊 Anonymization Summary:");
    println!("  Requested: {}", entity_ids.len());
    println!("  Succeeded: {succeeded}");
    println!("  Failed: {}", entity_ids.len() - succeeded);
    println!();

    exit_code
}
