//! Anonymization strategy module
//!
//! Each [`StrategyKind`] maps to a stateless [`Strategy`] implementation.
//! Strategies work on JSON values and never see the surrounding entity.

pub mod clear;
pub mod generalize;
pub mod hash;
pub mod randomize;

use crate::anonymization::models::{FieldScope, StrategyKind};
use crate::domain::{EraserError, Result};
use serde_json::Value;

pub use clear::ClearStrategy;
pub use generalize::GeneralizeStrategy;
pub use hash::HashStrategy;
pub use randomize::RandomizeStrategy;

/// Trait for anonymization strategy implementations
pub trait Strategy: Send + Sync {
    /// The kind this strategy implements
    fn kind(&self) -> StrategyKind;

    /// Anonymize a single value
    ///
    /// # Errors
    ///
    /// Returns [`EraserError::Strategy`] when the value's shape is not
    /// supported by the strategy.
    fn apply(&self, value: &Value) -> Result<Value>;
}

/// Strategy that returns the value untouched
pub struct SkipStrategy;

impl Strategy for SkipStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Skip
    }

    fn apply(&self, value: &Value) -> Result<Value> {
        Ok(value.clone())
    }
}

/// Returns the strategy implementing `kind`
pub fn strategy_for(kind: StrategyKind) -> &'static dyn Strategy {
    match kind {
        StrategyKind::Clear => &ClearStrategy,
        StrategyKind::Hash => &HashStrategy,
        StrategyKind::Randomize => &RandomizeStrategy,
        StrategyKind::Generalize => &GeneralizeStrategy,
        StrategyKind::Skip => &SkipStrategy,
    }
}

/// Apply a strategy to a property value
pub fn apply_strategy(kind: StrategyKind, value: &Value) -> Result<Value> {
    strategy_for(kind).apply(value)
}

/// Apply a strategy to a field value according to its scope
///
/// A multi-value field is anonymized element by element; a scalar found in a
/// multi-value field is treated as a one-element list and written back as a
/// scalar.
pub fn apply_field_strategy(kind: StrategyKind, scope: FieldScope, value: &Value) -> Result<Value> {
    let strategy = strategy_for(kind);
    match (scope, value) {
        (FieldScope::Multivalue, Value::Array(items)) => items
            .iter()
            .map(|item| strategy.apply(item))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        _ => strategy.apply(value),
    }
}

/// Short description of a JSON value's shape, safe to put in logs
pub(crate) fn value_shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Error for a value shape a strategy does not accept
pub(crate) fn unsupported(kind: StrategyKind, value: &Value) -> EraserError {
    EraserError::Strategy(format!(
        "{} strategy cannot anonymize a value of type {}",
        kind,
        value_shape(value)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strategy_for_matches_kind() {
        for kind in [
            StrategyKind::Clear,
            StrategyKind::Hash,
            StrategyKind::Randomize,
            StrategyKind::Generalize,
            StrategyKind::Skip,
        ] {
            assert_eq!(strategy_for(kind).kind(), kind);
        }
    }

    #[test]
    fn test_skip_is_noop() {
        let value = json!({"nested": [1, 2]});
        assert_eq!(apply_strategy(StrategyKind::Skip, &value).unwrap(), value);
    }

    #[test]
    fn test_multivalue_field_applies_per_element() {
        let value = json!(["1990-01-02", "2001-12-31"]);
        let result =
            apply_field_strategy(StrategyKind::Generalize, FieldScope::Multivalue, &value).unwrap();
        assert_eq!(result, json!(["1990", "2001"]));
    }

    #[test]
    fn test_multivalue_field_with_scalar() {
        let result =
            apply_field_strategy(StrategyKind::Clear, FieldScope::Multivalue, &json!("x")).unwrap();
        assert_eq!(result, json!(""));
    }

    #[test]
    fn test_single_value_field_rejects_array_for_hash() {
        let result =
            apply_field_strategy(StrategyKind::Hash, FieldScope::SingleValue, &json!(["a"]));
        assert!(matches!(result, Err(EraserError::Strategy(_))));
    }

    #[test]
    fn test_unsupported_message_has_no_value() {
        let err = unsupported(StrategyKind::Hash, &json!({"secret": "jane@example.com"}));
        let message = err.to_string();
        assert!(message.contains("object"));
        assert!(!message.contains("jane"));
    }
}
