// gdpr-eraser - Entity anonymization engine
// Copyright (c) 2025 Eraser Contributors
// Licensed under the MIT License

//! # gdpr-eraser - Entity anonymization engine
//!
//! gdpr-eraser anonymizes the personal data of stored entities (users,
//! orders, ...) on behalf of right-to-erasure requests.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Registering** which properties and fields of each entity type hold
//!   personal data, and how each is anonymized
//! - **Extending** that registry through ordered alter callbacks, and
//!   notifying observers before each anonymization
//! - **Anonymizing** an entity in one atomic commit, with a deadline and
//!   coalescing of concurrent requests for the same entity
//! - **Auditing** every request without ever writing original values
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`anonymization`] - Registry, extensions, strategies and the engine
//! - [`adapters`] - Host entity stores (in-memory, JSON file)
//! - [`domain`] - Identifiers, entity snapshots and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gdpr_eraser::adapters::InMemoryEntityStore;
//! use gdpr_eraser::anonymization::{
//!     Anonymizer, EngineOptions, PropertyAnonymizationSpec, PropertyRegistry, StrategyKind,
//! };
//! use gdpr_eraser::domain::{EntityId, EntityTypeKey};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let user = EntityTypeKey::new("user")?;
//!     let mut registry = PropertyRegistry::new();
//!     let specs = vec![PropertyAnonymizationSpec::new("mail", StrategyKind::Hash)];
//!     registry.register_type(&user, specs)?;
//!
//!     let store = Arc::new(InMemoryEntityStore::new());
//!     let engine = Anonymizer::new(registry, store.clone(), store, EngineOptions::default());
//!
//!     let outcome = engine.anonymize(&user, &EntityId::from(42)).await?;
//!     println!("Anonymized {} values", outcome.applied_spec_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every request ends in an [`anonymization::AnonymizationOutcome`] or in one
//! [`domain::EraserError`]:
//!
//! ```rust,no_run
//! use gdpr_eraser::domain::EraserError;
//!
//! fn example() -> Result<(), EraserError> {
//!     let config = gdpr_eraser::config::load_config("gdpr-eraser.toml")?;
//!     println!("{} entity types", config.registry.len());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
