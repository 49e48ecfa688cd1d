//! Clear anonymization strategy

use super::Strategy;
use crate::anonymization::models::StrategyKind;
use crate::domain::Result;
use serde_json::{Map, Value};

/// Clear strategy - replaces a value with the empty value of its type
pub struct ClearStrategy;

impl Strategy for ClearStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Clear
    }

    fn apply(&self, value: &Value) -> Result<Value> {
        Ok(match value {
            Value::Null => Value::Null,
            Value::Bool(_) => Value::Bool(false),
            Value::Number(_) => Value::from(0),
            Value::String(_) => Value::String(String::new()),
            Value::Array(_) => Value::Array(Vec::new()),
            Value::Object(_) => Value::Object(Map::new()),
        })
    }
}
