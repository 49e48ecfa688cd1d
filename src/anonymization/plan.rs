//! Anonymization plans
//!
//! A plan is the list of property and field specs that apply to one entity,
//! built fresh for every request from the effective registry. It is handed to
//! observers read-only and then resolved against the entity snapshot into a
//! buffered write set.

use crate::anonymization::models::{
    FieldAnonymizationSpec, PropertyAnonymizationSpec, ResolvedValue, StrategyKind, ValueTarget,
};
use crate::anonymization::registry::PropertyRegistry;
use crate::anonymization::strategy::{apply_field_strategy, apply_strategy};
use crate::domain::ids::FORBIDDEN_ENTITY_TYPE;
use crate::domain::{EntityId, EntitySnapshot, EntityTypeKey, EraserError, Result};
use serde::Serialize;
use serde_json::Value;

/// Specs to apply to one entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnonymizationPlan {
    /// Entity type
    pub entity_type: EntityTypeKey,

    /// Entity ID
    pub entity_id: EntityId,

    /// Property specs, in registration order
    pub properties: Vec<PropertyAnonymizationSpec>,

    /// Field specs, in registration order
    pub fields: Vec<FieldAnonymizationSpec>,
}

/// One value changed by a plan
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChange {
    /// Property or field written
    pub target: ValueTarget,

    /// Strategy that produced the new value
    pub strategy: StrategyKind,

    /// Value before anonymization
    pub original: Value,

    /// Value after anonymization
    pub anonymized: Value,
}

/// Result of resolving a plan against an entity snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Values to write, in plan order
    pub changes: Vec<ValueChange>,

    /// Specs skipped (`skip` strategy or value absent from the entity)
    pub skipped: usize,
}

impl Resolution {
    /// Number of specs that produced a write
    pub fn applied(&self) -> usize {
        self.changes.len()
    }

    /// The buffered write set handed to the field data adapter
    pub fn write_set(&self) -> Vec<ResolvedValue> {
        self.changes
            .iter()
            .map(|change| ResolvedValue {
                target: change.target.clone(),
                value: change.anonymized.clone(),
            })
            .collect()
    }
}

impl AnonymizationPlan {
    /// Build the plan for an entity from the effective registry
    ///
    /// # Errors
    ///
    /// Returns [`EraserError::Configuration`] when the entity type is the
    /// order-bound customer profile type or has no registered specs.
    pub fn build(
        registry: &PropertyRegistry,
        entity_type: &EntityTypeKey,
        entity_id: &EntityId,
    ) -> Result<Self> {
        if entity_type.is_forbidden() {
            return Err(EraserError::Configuration(format!(
                "Entities of type '{FORBIDDEN_ENTITY_TYPE}' cannot be anonymized on their own"
            )));
        }

        let specs = registry
            .type_specs(entity_type)
            .filter(|specs| !specs.is_empty())
            .ok_or_else(|| {
                EraserError::Configuration(format!(
                    "Nothing to anonymize: no properties or fields registered for entity type '{entity_type}'"
                ))
            })?;

        Ok(Self {
            entity_type: entity_type.clone(),
            entity_id: entity_id.clone(),
            properties: specs.properties.clone(),
            fields: specs.fields.clone(),
        })
    }

    /// Plan without any spec
    #[cfg(test)]
    pub(crate) fn empty(entity_type: EntityTypeKey, entity_id: EntityId) -> Self {
        Self {
            entity_type,
            entity_id,
            properties: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Number of specs in the plan
    pub fn spec_count(&self) -> usize {
        self.properties.len() + self.fields.len()
    }

    /// Apply every spec to the snapshot, in memory
    ///
    /// Properties are resolved before fields. Nothing is written to the host.
    ///
    /// # Errors
    ///
    /// Returns [`EraserError::Strategy`] naming the target whose value the
    /// strategy cannot handle.
    pub fn resolve(&self, entity: &EntitySnapshot) -> Result<Resolution> {
        let mut resolution = Resolution::default();

        for spec in &self.properties {
            let target = ValueTarget::Property(spec.property_name.clone());
            match entity.property(&spec.property_name) {
                Some(original) if spec.strategy != StrategyKind::Skip => {
                    let anonymized =
                        apply_strategy(spec.strategy, original).map_err(|e| at_target(&target, e))?;
                    resolution.changes.push(ValueChange {
                        target,
                        strategy: spec.strategy,
                        original: original.clone(),
                        anonymized,
                    });
                }
                Some(_) => resolution.skipped += 1,
                None => {
                    tracing::debug!(
                        entity_type = %self.entity_type,
                        entity_id = %self.entity_id,
                        target = %target,
                        "Value absent, skipping"
                    );
                    resolution.skipped += 1;
                }
            }
        }

        for spec in &self.fields {
            let target = ValueTarget::Field(spec.field_name.clone());
            match entity.field(&spec.field_name) {
                Some(original) if spec.strategy != StrategyKind::Skip => {
                    let anonymized = apply_field_strategy(spec.strategy, spec.scope, original)
                        .map_err(|e| at_target(&target, e))?;
                    resolution.changes.push(ValueChange {
                        target,
                        strategy: spec.strategy,
                        original: original.clone(),
                        anonymized,
                    });
                }
                Some(_) => resolution.skipped += 1,
                None => {
                    tracing::debug!(
                        entity_type = %self.entity_type,
                        entity_id = %self.entity_id,
                        target = %target,
                        "Value absent, skipping"
                    );
                    resolution.skipped += 1;
                }
            }
        }

        Ok(resolution)
    }
}

fn at_target(target: &ValueTarget, error: EraserError) -> EraserError {
    match error {
        EraserError::Strategy(message) => EraserError::Strategy(format!("{target}: {message}")),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::FieldScope;
    use crate::anonymization::strategy::HashStrategy;
    use serde_json::json;

    fn user_registry() -> PropertyRegistry {
        let mut registry = PropertyRegistry::new();
        let user = EntityTypeKey::new("user").unwrap();
        registry
            .register_type(
                &user,
                vec![
                    PropertyAnonymizationSpec::new("mail", StrategyKind::Hash),
                    PropertyAnonymizationSpec::new("name", StrategyKind::Clear),
                    PropertyAnonymizationSpec::new("uid", StrategyKind::Skip),
                ],
            )
            .unwrap();
        registry
            .register_fields(
                &user,
                vec![FieldAnonymizationSpec::new(
                    "field_phone",
                    StrategyKind::Clear,
                    FieldScope::Multivalue,
                )],
            )
            .unwrap();
        registry
    }

    fn user_plan() -> AnonymizationPlan {
        AnonymizationPlan::build(
            &user_registry(),
            &EntityTypeKey::new("user").unwrap(),
            &EntityId::from(42),
        )
        .unwrap()
    }

    #[test]
    fn test_build_copies_specs_in_order() {
        let plan = user_plan();
        assert_eq!(plan.spec_count(), 4);
        assert_eq!(plan.properties[0].property_name, "mail");
        assert_eq!(plan.fields[0].field_name, "field_phone");
    }

    #[test]
    fn test_build_rejects_unknown_type() {
        let result = AnonymizationPlan::build(
            &user_registry(),
            &EntityTypeKey::new("node").unwrap(),
            &EntityId::from(1),
        );
        assert!(matches!(result, Err(EraserError::Configuration(_))));
    }

    #[test]
    fn test_build_rejects_forbidden_type() {
        let result = AnonymizationPlan::build(
            &user_registry(),
            &EntityTypeKey::new(FORBIDDEN_ENTITY_TYPE).unwrap(),
            &EntityId::from(1),
        );
        assert!(matches!(result, Err(EraserError::Configuration(_))));
    }

    #[test]
    fn test_resolve_counts_applied_and_skipped() {
        let entity = EntitySnapshot::builder()
            .entity_type("user")
            .unwrap()
            .entity_id("42")
            .unwrap()
            .property("mail", json!("a@b.c"))
            .property("uid", json!(42))
            .field("field_phone", json!(["555-0100", "555-0101"]))
            .build()
            .unwrap();

        let resolution = user_plan().resolve(&entity).unwrap();

        // mail and field_phone written; name absent, uid skipped
        assert_eq!(resolution.applied(), 2);
        assert_eq!(resolution.skipped, 2);

        let writes = resolution.write_set();
        assert_eq!(
            writes[0],
            ResolvedValue::property("mail", json!(HashStrategy::digest("a@b.c")))
        );
        assert_eq!(writes[1], ResolvedValue::field("field_phone", json!(["", ""])));
    }

    #[test]
    fn test_resolve_strategy_error_names_target() {
        let entity = EntitySnapshot::builder()
            .entity_type("user")
            .unwrap()
            .entity_id("42")
            .unwrap()
            .property("mail", json!({"nested": true}))
            .build()
            .unwrap();

        match user_plan().resolve(&entity) {
            Err(EraserError::Strategy(message)) => assert!(message.starts_with("property:mail")),
            other => panic!("expected strategy error, got {other:?}"),
        }
    }
}
