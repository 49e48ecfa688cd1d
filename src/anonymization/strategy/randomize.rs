//! Randomize anonymization strategy

use super::{unsupported, Strategy};
use crate::anonymization::models::StrategyKind;
use crate::domain::Result;
use rand::Rng;
use serde_json::Value;
use uuid::Uuid;

/// Upper bound for random integers, kept within the exactly representable
/// range of an IEEE double so downstream JSON consumers do not round them.
const MAX_RANDOM_INTEGER: u64 = 1 << 53;

/// Domain used for synthetic email addresses (RFC 2606 reserved)
const SYNTHETIC_EMAIL_DOMAIN: &str = "example.invalid";

/// Randomize strategy - replaces a scalar with fresh synthetic content
///
/// String output embeds a v4 UUID, so two runs never collide in practice.
pub struct RandomizeStrategy;

impl RandomizeStrategy {
    /// Synthetic replacement for a string, keeping email shape
    fn synthetic_string(original: &str) -> String {
        let token = Uuid::new_v4().simple();
        if looks_like_email(original) {
            format!("anon-{token}@{SYNTHETIC_EMAIL_DOMAIN}")
        } else {
            format!("anon-{token}")
        }
    }
}

impl Strategy for RandomizeStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Randomize
    }

    fn apply(&self, value: &Value) -> Result<Value> {
        let mut rng = rand::thread_rng();
        match value {
            Value::Null => Ok(Value::Null),
            Value::Bool(_) => Ok(Value::Bool(rng.gen())),
            Value::Number(n) if n.is_f64() => Ok(Value::from(rng.gen::<f64>())),
            Value::Number(_) => Ok(Value::from(rng.gen_range(0..MAX_RANDOM_INTEGER))),
            Value::String(s) => Ok(Value::String(Self::synthetic_string(s))),
            Value::Array(_) | Value::Object(_) => Err(unsupported(self.kind(), value)),
        }
    }
}

/// Loose email check: something before and after a single `@`
pub(crate) fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;
    use serde_json::json;

    #[test]
    fn test_randomize_email_keeps_shape() {
        let email: String = SafeEmail().fake();
        let result = RandomizeStrategy.apply(&json!(email)).unwrap();
        let result = result.as_str().unwrap();
        assert!(result.starts_with("anon-"));
        assert!(result.ends_with("@example.invalid"));
        assert_ne!(result, email);
    }

    #[test]
    fn test_randomize_name() {
        let name: String = Name().fake();
        let result = RandomizeStrategy.apply(&json!(name)).unwrap();
        let result = result.as_str().unwrap();
        assert!(result.starts_with("anon-"));
        assert!(!result.contains('@'));
    }

    #[test]
    fn test_randomize_is_not_deterministic() {
        let value = json!("jane@example.com");
        let a = RandomizeStrategy.apply(&value).unwrap();
        let b = RandomizeStrategy.apply(&value).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_randomize_keeps_number_kind() {
        let int = RandomizeStrategy.apply(&json!(37)).unwrap();
        assert!(int.is_u64());
        assert!(int.as_u64().unwrap() < MAX_RANDOM_INTEGER);

        let float = RandomizeStrategy.apply(&json!(1.5)).unwrap();
        assert!(float.is_f64());
    }

    #[test]
    fn test_randomize_boolean_and_null() {
        assert!(RandomizeStrategy.apply(&json!(false)).unwrap().is_boolean());
        assert_eq!(RandomizeStrategy.apply(&json!(null)).unwrap(), json!(null));
    }

    #[test]
    fn test_randomize_rejects_composites() {
        assert!(RandomizeStrategy.apply(&json!({"a": 1})).is_err());
    }

    #[test]
    fn test_looks_like_email() {
        assert!(looks_like_email("a@b.c"));
        assert!(!looks_like_email("@b.c"));
        assert!(!looks_like_email("a@"));
        assert!(!looks_like_email("plain"));
        assert!(!looks_like_email("a@b@c"));
    }
}
