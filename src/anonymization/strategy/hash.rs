//! Hash anonymization strategy

use super::{unsupported, Strategy};
use crate::anonymization::models::StrategyKind;
use crate::domain::Result;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Hash strategy - replaces a scalar with the SHA-256 hex digest of its text
///
/// The digest is unsalted so the same original always maps to the same
/// output, which keeps anonymized records comparable for deduplication.
pub struct HashStrategy;

impl HashStrategy {
    /// Hex-encoded SHA-256 of a string
    pub fn digest(input: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(input.as_bytes());
        let result = hasher.finalize();
        format!("{result:x}")
    }
}

impl Strategy for HashStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Hash
    }

    fn apply(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::String(s) => Ok(Value::String(Self::digest(s))),
            Value::Number(n) => Ok(Value::String(Self::digest(&n.to_string()))),
            Value::Bool(b) => Ok(Value::String(Self::digest(&b.to_string()))),
            Value::Array(_) | Value::Object(_) => Err(unsupported(self.kind(), value)),
        }
    }
}
