//! Property registry
//!
//! Holds, per entity type, which properties and fields are anonymizable and
//! by which strategy. The registry is built once (seeded from configuration,
//! then altered by extension callbacks) and read-only while requests run.

use crate::anonymization::extension::ExtensionRegistry;
use crate::anonymization::models::{
    EntityTypeSpecs, FieldAnonymizationSpec, FieldScope, PropertyAnonymizationSpec, StrategyKind,
};
use crate::domain::ids::{EntityTypeKey, FORBIDDEN_ENTITY_TYPE};
use crate::domain::{EraserError, Result};
use std::collections::{BTreeMap, HashSet};

/// Registry of anonymizable properties and fields per entity type
///
/// # Examples
///
/// ```
/// use gdpr_eraser::anonymization::models::{PropertyAnonymizationSpec, StrategyKind};
/// use gdpr_eraser::anonymization::registry::PropertyRegistry;
/// use gdpr_eraser::domain::EntityTypeKey;
///
/// let mut registry = PropertyRegistry::new();
/// let user = EntityTypeKey::new("user").unwrap();
/// registry
///     .register_type(&user, vec![PropertyAnonymizationSpec::new("mail", StrategyKind::Hash)])
///     .unwrap();
///
/// assert_eq!(registry.specs(&user).len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyRegistry {
    types: BTreeMap<EntityTypeKey, EntityTypeSpecs>,
}

impl PropertyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the property specs of an entity type
    ///
    /// # Errors
    ///
    /// Returns [`EraserError::Configuration`] when `key` is the order-bound
    /// customer profile type or when two specs share a property name. The
    /// registry is left unchanged on error.
    pub fn register_type(
        &mut self,
        key: &EntityTypeKey,
        specs: Vec<PropertyAnonymizationSpec>,
    ) -> Result<()> {
        ensure_not_forbidden(key)?;
        ensure_unique(key, specs.iter().map(|s| s.property_name.as_str()), "property")?;

        tracing::debug!(entity_type = %key, count = specs.len(), "Registering property specs");
        self.types.entry(key.clone()).or_default().properties = specs;
        Ok(())
    }

    /// Register (or replace) the field specs of an entity type
    ///
    /// # Errors
    ///
    /// Same rules as [`register_type`](Self::register_type).
    pub fn register_fields(
        &mut self,
        key: &EntityTypeKey,
        specs: Vec<FieldAnonymizationSpec>,
    ) -> Result<()> {
        ensure_not_forbidden(key)?;
        ensure_unique(key, specs.iter().map(|s| s.field_name.as_str()), "field")?;

        tracing::debug!(entity_type = %key, count = specs.len(), "Registering field specs");
        self.types.entry(key.clone()).or_default().fields = specs;
        Ok(())
    }

    /// Property specs of an entity type; empty for unknown types
    pub fn specs(&self, key: &EntityTypeKey) -> &[PropertyAnonymizationSpec] {
        self.types
            .get(key)
            .map(|t| t.properties.as_slice())
            .unwrap_or(&[])
    }

    /// Field specs of an entity type; empty for unknown types
    pub fn field_specs(&self, key: &EntityTypeKey) -> &[FieldAnonymizationSpec] {
        self.types
            .get(key)
            .map(|t| t.fields.as_slice())
            .unwrap_or(&[])
    }

    /// All specs of an entity type, if registered
    pub fn type_specs(&self, key: &EntityTypeKey) -> Option<&EntityTypeSpecs> {
        self.types.get(key)
    }

    /// Registered entity types in key order
    pub fn entity_types(&self) -> impl Iterator<Item = &EntityTypeKey> {
        self.types.keys()
    }

    /// Iterate over every entity type and its specs
    pub fn iter(&self) -> impl Iterator<Item = (&EntityTypeKey, &EntityTypeSpecs)> {
        self.types.iter()
    }

    /// Number of registered entity types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no entity type is registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Run every alter callback in registration order against this registry
    ///
    /// # Errors
    ///
    /// Returns [`EraserError::RegistryAlter`] from the first failing callback.
    /// Changes made by earlier callbacks are kept.
    pub fn apply_alterations(&mut self, extensions: &ExtensionRegistry) -> Result<()> {
        let mut view = RegistryView::new(self);
        extensions.run_alter_phase(&mut view)
    }
}

fn ensure_not_forbidden(key: &EntityTypeKey) -> Result<()> {
    if key.is_forbidden() {
        return Err(EraserError::Configuration(format!(
            "Entity type '{FORBIDDEN_ENTITY_TYPE}' cannot be registered: a customer profile bound to an order cannot be saved on its own"
        )));
    }
    Ok(())
}

fn ensure_unique<'a>(
    key: &EntityTypeKey,
    names: impl Iterator<Item = &'a str>,
    what: &str,
) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(EraserError::Configuration(format!(
                "Duplicate {what} '{name}' registered for entity type '{key}'"
            )));
        }
    }
    Ok(())
}

/// Mutable view of the registry handed to alter callbacks
///
/// Every change aimed at the order-bound customer profile type is dropped
/// with a warning instead of failing the callback.
pub struct RegistryView<'a> {
    registry: &'a mut PropertyRegistry,
}

impl<'a> RegistryView<'a> {
    pub(crate) fn new(registry: &'a mut PropertyRegistry) -> Self {
        Self { registry }
    }

    fn writable(&self, key: &EntityTypeKey, operation: &str) -> bool {
        if key.is_forbidden() {
            tracing::warn!(
                entity_type = %key,
                operation = operation,
                "Ignoring registry alteration for forbidden entity type"
            );
            return false;
        }
        true
    }

    /// Read-only access to the registry being altered
    pub fn registry(&self) -> &PropertyRegistry {
        &*self.registry
    }

    /// Registered entity types
    pub fn entity_types(&self) -> Vec<EntityTypeKey> {
        self.registry.entity_types().cloned().collect()
    }

    /// Current strategy of a property
    pub fn property_strategy(&self, key: &EntityTypeKey, property: &str) -> Option<StrategyKind> {
        self.registry
            .specs(key)
            .iter()
            .find(|s| s.property_name == property)
            .map(|s| s.strategy)
    }

    /// Add a property or change its strategy
    ///
    /// A new property is appended after the existing ones; a retyped property
    /// keeps its position.
    pub fn set_property_strategy(
        &mut self,
        key: &EntityTypeKey,
        property: &str,
        strategy: StrategyKind,
    ) {
        if !self.writable(key, "set_property_strategy") {
            return;
        }
        let specs = &mut self.registry.types.entry(key.clone()).or_default().properties;
        match specs.iter_mut().find(|s| s.property_name == property) {
            Some(spec) => spec.strategy = strategy,
            None => specs.push(PropertyAnonymizationSpec::new(property, strategy)),
        }
    }

    /// Remove a property; returns whether it was registered
    pub fn remove_property(&mut self, key: &EntityTypeKey, property: &str) -> bool {
        if !self.writable(key, "remove_property") {
            return false;
        }
        match self.registry.types.get_mut(key) {
            Some(entry) => {
                let before = entry.properties.len();
                entry.properties.retain(|s| s.property_name != property);
                entry.properties.len() != before
            }
            None => false,
        }
    }

    /// Add a field or change its strategy and scope
    pub fn set_field_strategy(
        &mut self,
        key: &EntityTypeKey,
        field: &str,
        strategy: StrategyKind,
        scope: FieldScope,
    ) {
        if !self.writable(key, "set_field_strategy") {
            return;
        }
        let specs = &mut self.registry.types.entry(key.clone()).or_default().fields;
        match specs.iter_mut().find(|s| s.field_name == field) {
            Some(spec) => {
                spec.strategy = strategy;
                spec.scope = scope;
            }
            None => specs.push(FieldAnonymizationSpec::new(field, strategy, scope)),
        }
    }

    /// Remove a field; returns whether it was registered
    pub fn remove_field(&mut self, key: &EntityTypeKey, field: &str) -> bool {
        if !self.writable(key, "remove_field") {
            return false;
        }
        match self.registry.types.get_mut(key) {
            Some(entry) => {
                let before = entry.fields.len();
                entry.fields.retain(|s| s.field_name != field);
                entry.fields.len() != before
            }
            None => false,
        }
    }

    /// Remove an entity type entirely; returns whether it was registered
    pub fn remove_type(&mut self, key: &EntityTypeKey) -> bool {
        if !self.writable(key, "remove_type") {
            return false;
        }
        self.registry.types.remove(key).is_some()
    }
}
