//! Generalization anonymization strategy

use super::randomize::looks_like_email;
use super::{unsupported, Strategy};
use crate::anonymization::models::StrategyKind;
use crate::domain::Result;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Width of the buckets numbers are floored into
const NUMBER_BUCKET: i64 = 10;

/// Generalize strategy - replaces a value with a coarser representative
///
/// - dates and timestamps become their year (`"1990-05-04"` -> `"1990"`)
/// - email addresses keep only their domain (`"*@example.com"`)
/// - numbers are floored to the decade (`37` -> `30`)
/// - other strings keep their first character
///
/// Applying the strategy to its own output returns that output unchanged.
pub struct GeneralizeStrategy;

impl GeneralizeStrategy {
    fn generalize_string(value: &str) -> String {
        if is_year(value) {
            return value.to_string();
        }
        if let Some(year) = parse_year(value).filter(|year| (0..=9999).contains(year)) {
            return format!("{year:04}");
        }
        if looks_like_email(value) {
            if let Some((_, domain)) = value.split_once('@') {
                return format!("*@{domain}");
            }
        }
        value.chars().next().map(String::from).unwrap_or_default()
    }

    fn generalize_number(number: &serde_json::Number) -> Value {
        if let Some(n) = number.as_i64() {
            // Floors below i64::MIN saturate
            let floored = n.div_euclid(NUMBER_BUCKET).checked_mul(NUMBER_BUCKET);
            Value::from(floored.unwrap_or(i64::MIN))
        } else if let Some(n) = number.as_u64() {
            Value::from(n / NUMBER_BUCKET as u64 * NUMBER_BUCKET as u64)
        } else {
            let n = number.as_f64().unwrap_or_default();
            let bucket = NUMBER_BUCKET as f64;
            Value::from((n / bucket).floor() * bucket)
        }
    }
}

impl Strategy for GeneralizeStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Generalize
    }

    fn apply(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Null | Value::Bool(_) => Ok(value.clone()),
            Value::Number(n) => Ok(Self::generalize_number(n)),
            Value::String(s) => Ok(Value::String(Self::generalize_string(s))),
            Value::Array(_) | Value::Object(_) => Err(unsupported(self.kind(), value)),
        }
    }
}

fn is_year(value: &str) -> bool {
    value.len() == 4 && value.chars().all(|c| c.is_ascii_digit())
}

/// Year of an ISO date, RFC 3339 timestamp or `YYYY-MM-DD HH:MM:SS` value
fn parse_year(value: &str) -> Option<i32> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.year());
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.year());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(timestamp.year());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!("1990-05-04"), json!("1990"); "date")]
    #[test_case(json!("2024-01-15T10:30:00Z"), json!("2024"); "rfc3339")]
    #[test_case(json!("2024-01-15 10:30:00"), json!("2024"); "sql datetime")]
    #[test_case(json!("1990"), json!("1990"); "year")]
    #[test_case(json!("jane.doe@example.com"), json!("*@example.com"); "email")]
    #[test_case(json!("Jane Doe"), json!("J"); "name")]
    #[test_case(json!(""), json!(""); "empty string")]
    #[test_case(json!(37), json!(30); "integer")]
    #[test_case(json!(-3), json!(-10); "negative integer")]
    #[test_case(json!(i64::MIN), json!(i64::MIN); "minimum integer")]
    #[test_case(json!(i64::MIN + 5), json!(i64::MIN); "near minimum integer")]
    #[test_case(json!(i64::MAX), json!(9_223_372_036_854_775_800_i64); "maximum integer")]
    #[test_case(json!("-0001-01-01"), json!("-"); "negative year date")]
    #[test_case(json!("+12345-01-01"), json!("+"); "five digit year date")]
    #[test_case(json!(42.7), json!(40.0); "float")]
    #[test_case(json!(true), json!(true); "boolean")]
    #[test_case(json!(null), json!(null); "null")]
    fn test_generalize(input: Value, expected: Value) {
        assert_eq!(GeneralizeStrategy.apply(&input).unwrap(), expected);
    }

    #[test_case(json!("1990-05-04"); "date")]
    #[test_case(json!("jane.doe@example.com"); "email")]
    #[test_case(json!("Jane Doe"); "name")]
    #[test_case(json!("-0001-01-01"); "negative year date")]
    #[test_case(json!("+12345-01-01"); "five digit year date")]
    #[test_case(json!("0999-12-31"); "three digit year date")]
    #[test_case(json!(37); "integer")]
    #[test_case(json!(i64::MIN); "minimum integer")]
    #[test_case(json!(42.7); "float")]
    fn test_generalize_is_idempotent(input: Value) {
        let once = GeneralizeStrategy.apply(&input).unwrap();
        let twice = GeneralizeStrategy.apply(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_generalize_multibyte_first_char() {
        assert_eq!(
            GeneralizeStrategy.apply(&json!("Ådne")).unwrap(),
            json!("Å")
        );
    }

    #[test]
    fn test_generalize_rejects_composites() {
        assert!(GeneralizeStrategy.apply(&json!([1, 2])).is_err());
    }
}
