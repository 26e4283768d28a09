//! Serde helper functions for query-string deserialization.
//!
//! Query parameters always arrive as strings. These helpers treat empty
//! values as absent and parse the rest into typed values.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// Deserialize an optional number from its string form, treating empty strings as None.
pub fn deserialize_optional_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if !s.trim().is_empty() => s
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Deserialize a `true`/`false` flag. Absent or empty means false.
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") | Some("false") => Ok(false),
        Some("true") => Ok(true),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected true or false, got {other}"
        ))),
    }
}

/// Deserialize a list separated by commas or whitespace. Empty lists are None.
pub fn deserialize_optional_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    let items: Vec<String> = s
        .unwrap_or_default()
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    Ok((!items.is_empty()).then_some(items))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test struct that uses the deserializer functions
    #[derive(Debug, Deserialize, PartialEq)]
    struct TestStruct {
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        string_field: Option<String>,
        #[serde(default, deserialize_with = "deserialize_optional_number")]
        number_field: Option<i64>,
        #[serde(default, deserialize_with = "deserialize_flag")]
        flag_field: bool,
        #[serde(default, deserialize_with = "deserialize_optional_list")]
        list_field: Option<Vec<String>>,
    }

    #[test]
    fn test_deserialize_optional_string_empty() {
        let json = r#"{"string_field": ""}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.string_field, None);
    }

    #[test]
    fn test_deserialize_optional_string_whitespace() {
        let json = r#"{"string_field": "   "}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.string_field, None);
    }

    #[test]
    fn test_deserialize_optional_string_value() {
        let json = r#"{"string_field": "hello"}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.string_field, Some("hello".to_string()));
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let json = r#"{}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.string_field, None);
        assert_eq!(result.number_field, None);
        assert!(!result.flag_field);
        assert_eq!(result.list_field, None);
    }

    #[test]
    fn test_deserialize_optional_number_valid() {
        let json = r#"{"number_field": "1700000000000"}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.number_field, Some(1_700_000_000_000));
    }

    #[test]
    fn test_deserialize_optional_number_invalid() {
        let json = r#"{"number_field": "soon"}"#;
        let result: Result<TestStruct, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_flag() {
        let on: TestStruct = serde_json::from_str(r#"{"flag_field": "true"}"#).unwrap();
        let off: TestStruct = serde_json::from_str(r#"{"flag_field": "false"}"#).unwrap();
        assert!(on.flag_field);
        assert!(!off.flag_field);
        assert!(serde_json::from_str::<TestStruct>(r#"{"flag_field": "yes"}"#).is_err());
    }

    #[test]
    fn test_deserialize_list_commas_and_spaces() {
        let json = r#"{"list_field": "Mexico, Brazil Ghana"}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(
            result.list_field,
            Some(vec![
                "Mexico".to_string(),
                "Brazil".to_string(),
                "Ghana".to_string()
            ])
        );
    }

    #[test]
    fn test_deserialize_list_blank_is_none() {
        let json = r#"{"list_field": " , "}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.list_field, None);
    }
}
