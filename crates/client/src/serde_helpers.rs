//! Serde helpers for the loosely typed `_cat` APIs.
//!
//! Responsibilities:
//! - Accept either JSON numbers or strings for numeric columns.
//! - Treat `null` and empty cells (closed indices report no segment stats) as zero.
//!
//! Invariants / assumptions:
//! - `_cat` endpoints return every column as a string when `format=json`,
//!   but some versions emit raw numbers; both forms must parse.

use serde::Deserialize;
use serde::de::Error as _;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum U64OrString {
    U64(u64),
    I64(i64),
    String(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    U64(u64),
    I64(i64),
    F64(f64),
}

/// Deserialize a count column, mapping `null`, missing and blank cells to zero.
pub fn u64_or_zero_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<U64OrString>::deserialize(deserializer)?;
    match value {
        None => Ok(0),
        Some(U64OrString::U64(v)) => Ok(v),
        Some(U64OrString::I64(v)) => u64::try_from(v).map_err(D::Error::custom),
        Some(U64OrString::String(s)) if s.trim().is_empty() => Ok(0),
        Some(U64OrString::String(s)) => s.trim().parse::<u64>().map_err(D::Error::custom),
    }
}

pub fn string_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = StringOrNumber::deserialize(deserializer)?;
    match value {
        StringOrNumber::String(s) => Ok(s),
        StringOrNumber::U64(v) => Ok(v.to_string()),
        StringOrNumber::I64(v) => Ok(v.to_string()),
        StringOrNumber::F64(v) => Ok(v.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Count {
        #[serde(default, deserialize_with = "u64_or_zero_from_string_or_number")]
        value: u64,
    }

    #[test]
    fn test_count_accepts_number_and_string() {
        let parsed: Count = serde_json::from_str(r#"{ "value": 3 }"#).unwrap();
        assert_eq!(parsed.value, 3);

        let parsed: Count = serde_json::from_str(r#"{ "value": "12" }"#).unwrap();
        assert_eq!(parsed.value, 12);
    }

    #[test]
    fn test_count_defaults_to_zero() {
        let parsed: Count = serde_json::from_str(r#"{ "value": null }"#).unwrap();
        assert_eq!(parsed.value, 0);

        let parsed: Count = serde_json::from_str(r#"{ "value": "" }"#).unwrap();
        assert_eq!(parsed.value, 0);

        let parsed: Count = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(parsed.value, 0);
    }

    #[test]
    fn test_count_rejects_garbage() {
        assert!(serde_json::from_str::<Count>(r#"{ "value": "many" }"#).is_err());
        assert!(serde_json::from_str::<Count>(r#"{ "value": -1 }"#).is_err());
    }

    #[test]
    fn test_string_from_number_or_string_accepts_number() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(deserialize_with = "string_from_number_or_string")]
            value: String,
        }

        let parsed: Wrapper = serde_json::from_str(r#"{ "value": 3 }"#).unwrap();
        assert_eq!(parsed.value, "3");

        let parsed: Wrapper = serde_json::from_str(r#"{ "value": "0" }"#).unwrap();
        assert_eq!(parsed.value, "0");
    }
}
