//! Host storage abstraction traits
//!
//! These traits define the narrow interface the engine needs from the host
//! system that owns the entities: read a snapshot, tell whether the entity is
//! owned by a parent, and write back a set of values atomically.

use crate::anonymization::models::ResolvedValue;
use crate::domain::{EntityId, EntitySnapshot, EntityTypeKey, Result};
use async_trait::async_trait;

/// Read access to host entities
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Load the current values of an entity
    ///
    /// # Errors
    ///
    /// Returns [`EntityNotFound`](crate::domain::EraserError::EntityNotFound)
    /// when the host has no such entity.
    async fn load_entity(
        &self,
        entity_type: &EntityTypeKey,
        entity_id: &EntityId,
    ) -> Result<EntitySnapshot>;

    /// Whether the entity is owned by a parent record and cannot be saved
    /// on its own (e.g. a customer profile referenced by an order)
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot be queried.
    async fn is_bound_to_parent(
        &self,
        entity_type: &EntityTypeKey,
        entity_id: &EntityId,
    ) -> Result<bool>;
}

/// Write access to host entity values
#[async_trait]
pub trait FieldDataAdapter: Send + Sync {
    /// Write every value in one atomic operation
    ///
    /// Either all values are persisted or none is.
    ///
    /// # Errors
    ///
    /// Returns [`Persistence`](crate::domain::EraserError::Persistence) when
    /// the write is rejected or fails.
    async fn commit_fields(
        &self,
        entity_type: &EntityTypeKey,
        entity_id: &EntityId,
        values: &[ResolvedValue],
    ) -> Result<()>;
}
