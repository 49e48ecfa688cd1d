//! Host store abstraction layer
//!
//! Trait-based access to the system that owns the entities, so the engine
//! works the same against a JSON file, an in-memory map or a real host.

pub mod factory;
pub mod traits;

pub use factory::{create_store, StorePair};
pub use traits::{EntityStore, FieldDataAdapter};

use crate::anonymization::models::{ResolvedValue, ValueTarget};
use crate::domain::{EraserError, Result};
use serde_json::{Map, Value};

/// Apply a write set to stored values, all or nothing
///
/// Every target must already exist; the first unknown target rejects the
/// whole set before anything is written.
pub(crate) fn apply_write_set(
    properties: &mut Map<String, Value>,
    fields: &mut Map<String, Value>,
    values: &[ResolvedValue],
) -> Result<()> {
    for resolved in values {
        let known = match &resolved.target {
            ValueTarget::Property(name) => properties.contains_key(name),
            ValueTarget::Field(name) => fields.contains_key(name),
        };
        if !known {
            return Err(EraserError::Persistence(format!(
                "Unknown write target {}",
                resolved.target
            )));
        }
    }

    for resolved in values {
        let slot = match &resolved.target {
            ValueTarget::Property(name) => properties.get_mut(name),
            ValueTarget::Field(name) => fields.get_mut(name),
        };
        if let Some(slot) = slot {
            *slot = resolved.value.clone();
        }
    }

    Ok(())
}
