//! Anonymization module for the eraser
//!
//! This module replaces personal data held in entity properties and fields
//! with anonymized values, on behalf of a right-to-erasure request.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! - **Registry**: which properties and fields of each entity type are
//!   anonymizable, and with which strategy
//! - **Extensions**: ordered alter callbacks that edit the registry once
//!   before first use, and observers notified before each anonymization
//! - **Plan**: the specs of one entity type, resolved against a snapshot
//! - **Strategies**: clear, hash, randomize, generalize and skip
//! - **Engine**: drives a request through its phases and commits once
//! - **Audit**: structured records with hashed original values
//!
//! # Usage
//!
//! ```rust,no_run
//! use gdpr_eraser::adapters::create_store;
//! use gdpr_eraser::anonymization::Anonymizer;
//! use gdpr_eraser::config::load_config;
//! use gdpr_eraser::domain::{EntityId, EntityTypeKey};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = load_config("gdpr-eraser.toml")?;
//! let engine = Anonymizer::from_config(&config, create_store(&config.store).await?)?;
//!
//! let user = EntityTypeKey::new("user").map_err(anyhow::Error::msg)?;
//! engine.anonymize(&user, &EntityId::from(42)).await?;
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod config;
pub mod engine;
pub mod extension;
pub mod models;
pub mod plan;
pub mod registry;
pub mod strategy;

// Re-export main types
pub use config::{AnonymizationConfig, AuditConfig, StrategyOverride};
pub use engine::{AnonymizationPhase, Anonymizer, EngineOptions};
pub use extension::{
    ExtensionRegistry, ObserverFailure, PreAnonymizeObserver, RegistryAlter, StrategyOverrideAlter,
};
pub use models::{
    AnonymizationOutcome, EntityTypeSpecs, FieldAnonymizationSpec, FieldScope,
    PropertyAnonymizationSpec, ResolvedValue, StrategyKind, ValueTarget,
};
pub use plan::{AnonymizationPlan, Resolution, ValueChange};
pub use registry::{PropertyRegistry, RegistryView};
