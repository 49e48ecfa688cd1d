//! Anonymization data models

use crate::domain::ids::{EntityId, EntityTypeKey};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// How a property or field value is anonymized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Replace with the type-appropriate empty value
    Clear,
    /// Replace with a SHA-256 digest of the original
    Hash,
    /// Replace with a freshly generated value of the same semantic type
    Randomize,
    /// Replace with a coarser representative (date -> year)
    Generalize,
    /// Leave the value untouched
    Skip,
}

impl StrategyKind {
    /// Label used in configuration files and console output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Hash => "hash",
            Self::Randomize => "randomize",
            Self::Generalize => "generalize",
            Self::Skip => "skip",
        }
    }

    /// Whether re-running this strategy on its own output yields the same value
    pub fn is_idempotent(&self) -> bool {
        matches!(self, Self::Clear | Self::Generalize | Self::Skip)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clear" => Ok(Self::Clear),
            "hash" => Ok(Self::Hash),
            "randomize" => Ok(Self::Randomize),
            "generalize" => Ok(Self::Generalize),
            "skip" => Ok(Self::Skip),
            _ => Err(format!(
                "Invalid strategy '{s}'. Must be one of: clear, hash, randomize, generalize, skip"
            )),
        }
    }
}

/// Cardinality of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldScope {
    /// The field holds one value
    #[default]
    SingleValue,
    /// The field holds a list of values, each anonymized on its own
    Multivalue,
}

/// Anonymization rule for one entity property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyAnonymizationSpec {
    /// Property name, unique within its entity type
    #[serde(rename = "name")]
    pub property_name: String,

    /// Strategy applied to the property
    pub strategy: StrategyKind,
}

impl PropertyAnonymizationSpec {
    /// Create a new property spec
    pub fn new(property_name: impl Into<String>, strategy: StrategyKind) -> Self {
        Self {
            property_name: property_name.into(),
            strategy,
        }
    }
}

/// Anonymization rule for one attached field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAnonymizationSpec {
    /// Field name, unique within its entity type
    #[serde(rename = "name")]
    pub field_name: String,

    /// Strategy applied to every value of the field
    pub strategy: StrategyKind,

    /// Single or multi-value
    #[serde(default)]
    pub scope: FieldScope,
}

impl FieldAnonymizationSpec {
    /// Create a new field spec
    pub fn new(field_name: impl Into<String>, strategy: StrategyKind, scope: FieldScope) -> Self {
        Self {
            field_name: field_name.into(),
            strategy,
            scope,
        }
    }
}

/// All registered specs of one entity type, in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTypeSpecs {
    /// Property specs
    #[serde(default)]
    pub properties: Vec<PropertyAnonymizationSpec>,

    /// Field specs
    #[serde(default)]
    pub fields: Vec<FieldAnonymizationSpec>,
}

impl EntityTypeSpecs {
    /// Whether neither properties nor fields are registered
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.fields.is_empty()
    }
}

/// What a resolved value is written to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum ValueTarget {
    /// An entity property
    Property(String),
    /// An attached field
    Field(String),
}

impl ValueTarget {
    /// Property or field name
    pub fn name(&self) -> &str {
        match self {
            Self::Property(name) | Self::Field(name) => name,
        }
    }
}

impl fmt::Display for ValueTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(name) => write!(f, "property:{name}"),
            Self::Field(name) => write!(f, "field:{name}"),
        }
    }
}

/// An anonymized value waiting to be committed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedValue {
    /// Property or field being written
    pub target: ValueTarget,

    /// New value
    pub value: Value,
}

impl ResolvedValue {
    /// Create a resolved property value
    pub fn property(name: impl Into<String>, value: Value) -> Self {
        Self {
            target: ValueTarget::Property(name.into()),
            value,
        }
    }

    /// Create a resolved field value
    pub fn field(name: impl Into<String>, value: Value) -> Self {
        Self {
            target: ValueTarget::Field(name.into()),
            value,
        }
    }
}

/// Successful result of one anonymization request
///
/// Re-anonymizing an entity is idempotent for `clear` and `generalize`
/// strategies (the persisted output is identical) and deliberately not
/// idempotent for `hash` and `randomize`: a re-run hashes the hash or draws a
/// new random value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymizationOutcome {
    /// Entity type
    pub entity_type: EntityTypeKey,

    /// Entity ID
    pub entity_id: EntityId,

    /// Specs whose strategy changed a value
    pub applied_spec_count: usize,

    /// Specs that were skipped (`skip` strategy or value absent)
    pub skipped_spec_count: usize,

    /// Observer callbacks that failed (non-fatal)
    pub observer_failures: Vec<String>,

    /// Whether persistence was skipped
    pub dry_run: bool,

    /// Wall-clock time of the request in milliseconds
    pub duration_ms: u64,
}

impl AnonymizationOutcome {
    /// Total number of specs considered
    pub fn total_spec_count(&self) -> usize {
        self.applied_spec_count + self.skipped_spec_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strategy_kind_parse() {
        assert_eq!("hash".parse::<StrategyKind>().unwrap(), StrategyKind::Hash);
        assert_eq!("CLEAR".parse::<StrategyKind>().unwrap(), StrategyKind::Clear);
        assert!("scramble".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn test_strategy_kind_serde() {
        let kind: StrategyKind = serde_json::from_value(json!("generalize")).unwrap();
        assert_eq!(kind, StrategyKind::Generalize);
        assert_eq!(serde_json::to_value(StrategyKind::Randomize).unwrap(), json!("randomize"));
    }

    #[test]
    fn test_idempotent_kinds() {
        assert!(StrategyKind::Clear.is_idempotent());
        assert!(StrategyKind::Generalize.is_idempotent());
        assert!(!StrategyKind::Hash.is_idempotent());
        assert!(!StrategyKind::Randomize.is_idempotent());
    }

    #[test]
    fn test_field_spec_default_scope() {
        let spec: FieldAnonymizationSpec =
            serde_json::from_value(json!({"name": "field_phone", "strategy": "clear"})).unwrap();
        assert_eq!(spec.scope, FieldScope::SingleValue);
    }

    #[test]
    fn test_value_target_display() {
        assert_eq!(ResolvedValue::property("mail", json!("")).target.to_string(), "property:mail");
        assert_eq!(ValueTarget::Field("field_x".into()).name(), "field_x");
    }
}
