//! Entity snapshot domain model
//!
//! This module defines the immutable view of a host entity that the
//! anonymization engine works on.

use super::ids::{EntityId, EntityTypeKey};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Snapshot of one host entity
///
/// Properties are the entity's base attributes (`mail`, `name`, ...). Fields
/// are attached field values; a multi-value field holds a JSON array.
///
/// # Examples
///
/// ```
/// use gdpr_eraser::domain::entity::EntitySnapshotBuilder;
/// use serde_json::json;
///
/// let snapshot = EntitySnapshotBuilder::new()
///     .entity_type("user")
///     .unwrap()
///     .entity_id("42")
///     .unwrap()
///     .property("mail", json!("jane@example.com"))
///     .field("field_phone", json!(["+44 20 7946 0000"]))
///     .build()
///     .unwrap();
///
/// assert_eq!(snapshot.property("mail"), Some(&json!("jane@example.com")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Entity type this snapshot belongs to
    pub entity_type: EntityTypeKey,

    /// Host identifier of the entity
    pub entity_id: EntityId,

    /// Base properties
    #[serde(default)]
    pub properties: Map<String, Value>,

    /// Attached field values
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl EntitySnapshot {
    /// Creates an empty snapshot
    pub fn new(entity_type: EntityTypeKey, entity_id: EntityId) -> Self {
        Self {
            entity_type,
            entity_id,
            properties: Map::new(),
            fields: Map::new(),
        }
    }

    /// Creates a new builder
    pub fn builder() -> EntitySnapshotBuilder {
        EntitySnapshotBuilder::default()
    }

    /// Returns a property value
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Returns a field value
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Builder for constructing EntitySnapshot instances
#[derive(Debug, Default)]
pub struct EntitySnapshotBuilder {
    entity_type: Option<EntityTypeKey>,
    entity_id: Option<EntityId>,
    properties: Map<String, Value>,
    fields: Map<String, Value>,
}

impl EntitySnapshotBuilder {
    /// Creates a new EntitySnapshotBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the entity type
    pub fn entity_type(mut self, entity_type: impl Into<String>) -> Result<Self, String> {
        self.entity_type = Some(EntityTypeKey::new(entity_type)?);
        Ok(self)
    }

    /// Sets the entity ID
    pub fn entity_id(mut self, entity_id: impl Into<String>) -> Result<Self, String> {
        self.entity_id = Some(EntityId::new(entity_id)?);
        Ok(self)
    }

    /// Adds a property value
    pub fn property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Adds a field value
    pub fn field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Builds the EntitySnapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the entity type or ID is missing
    pub fn build(self) -> Result<EntitySnapshot, String> {
        Ok(EntitySnapshot {
            entity_type: self.entity_type.ok_or("entity_type is required")?,
            entity_id: self.entity_id.ok_or("entity_id is required")?,
            properties: self.properties,
            fields: self.fields,
        })
    }
}
