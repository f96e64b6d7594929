//! Lenient numeric decoding for upstream payloads.
//!
//! Commerce and settings APIs are inconsistent about numbers: prices arrive as
//! JSON numbers, discount amounts as `"10.0000"`, and either may be `null` or
//! missing. These helpers decode all of those into `Option<f64>` and never fail.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Bool(bool),
    Other(serde_json::Value),
}

/// Interpret a loosely-typed value as a finite number.
///
/// Strings are trimmed and parsed; empty strings, garbage, booleans, arrays,
/// objects and non-finite results are `None`.
pub fn number_from_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        serde_json::Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Parse a decimal string into a finite number.
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `deserialize_with` helper: number, numeric string, `null` or garbage → `Option<f64>`.
///
/// Use together with `#[serde(default)]` so absent fields also decode to `None`.
pub fn option_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawNumber::Number(v)) if v.is_finite() => Some(v),
        Some(RawNumber::Text(s)) => {
            let parsed = parse_number(&s);
            if parsed.is_none() {
                tracing::debug!(raw = %s, "ignoring non-numeric value");
            }
            parsed
        }
        Some(RawNumber::Bool(_)) | Some(RawNumber::Other(_)) => None,
        Some(RawNumber::Number(_)) | None => None,
    })
}

/// `deserialize_with` helper: a value that fails to decode as `T` becomes `None`.
///
/// For optional typed fields (currency codes, ids, nested references) whose
/// malformed contents should read as absent instead of failing the payload.
pub fn option_or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match serde_json::from_value::<T>(value) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            tracing::debug!(error = %err, "ignoring malformed value");
            None
        }
    }))
}

/// `deserialize_with` helper: decode a list, dropping entries that are not a `T`.
///
/// `null` decodes to an empty list. Dropped entries are logged at `warn`.
pub fn vec_skip_invalid<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<T>(value.clone()) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::warn!(entry = %value, error = %err, "skipping malformed list entry");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "option_f64")]
        amount: Option<f64>,
    }

    fn decode(json: &str) -> Option<f64> {
        serde_json::from_str::<Holder>(json).unwrap().amount
    }

    #[test]
    fn decodes_numbers_and_numeric_strings() {
        assert_eq!(decode(r#"{"amount": 12.5}"#), Some(12.5));
        assert_eq!(decode(r#"{"amount": "10.0000"}"#), Some(10.0));
        assert_eq!(decode(r#"{"amount": " 7 "}"#), Some(7.0));
    }

    #[test]
    fn missing_null_and_garbage_decode_to_none() {
        assert_eq!(decode(r#"{}"#), None);
        assert_eq!(decode(r#"{"amount": null}"#), None);
        assert_eq!(decode(r#"{"amount": "ten"}"#), None);
        assert_eq!(decode(r#"{"amount": ""}"#), None);
        assert_eq!(decode(r#"{"amount": true}"#), None);
        assert_eq!(decode(r#"{"amount": [1]}"#), None);
    }

    #[derive(Debug, Deserialize)]
    struct Tagged {
        #[serde(default, deserialize_with = "option_or_none")]
        id: Option<u64>,
        #[serde(default, deserialize_with = "vec_skip_invalid")]
        ids: Vec<u64>,
    }

    #[test]
    fn malformed_typed_value_reads_as_absent() {
        let t: Tagged = serde_json::from_str(r#"{"id": "nope", "ids": [1, "x", -2, 3]}"#).unwrap();
        assert_eq!(t.id, None);
        assert_eq!(t.ids, vec![1, 3]);

        let t: Tagged = serde_json::from_str(r#"{"id": 9, "ids": null}"#).unwrap();
        assert_eq!(t.id, Some(9));
        assert!(t.ids.is_empty());
    }

    #[test]
    fn value_helper_matches_deserializer() {
        assert_eq!(number_from_value(&serde_json::json!("3.25")), Some(3.25));
        assert_eq!(number_from_value(&serde_json::json!(4)), Some(4.0));
        assert_eq!(number_from_value(&serde_json::json!({"v": 1})), None);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: arbitrary text never decodes to a non-finite number.
            #[test]
            fn arbitrary_text_is_finite_or_none(s in ".{0,24}") {
                let value = serde_json::json!({ "amount": s });
                let holder: Holder = serde_json::from_value(value).unwrap();
                prop_assert!(holder.amount.is_none_or(f64::is_finite));
            }

            /// Property: finite numbers survive being sent as strings.
            #[test]
            fn numeric_strings_match_numbers(v in -1.0e9f64..1.0e9) {
                prop_assert_eq!(parse_number(&format!(" {v} ")), Some(v));
            }
        }
    }
}
