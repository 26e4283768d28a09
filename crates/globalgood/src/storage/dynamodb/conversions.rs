//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between JSON documents and DynamoDB
//! AttributeValue maps. These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use globalgood_core::storage::{Item, Key, RepositoryError, SetUpdate};
use serde_json::{Number, Value};

pub type Attributes = HashMap<String, AttributeValue>;

// ============================================================================
// JSON -> DynamoDB
// ============================================================================

/// Convert a JSON value to an AttributeValue.
pub fn to_attribute(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(values) => AttributeValue::L(values.into_iter().map(to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(
            map.into_iter()
                .map(|(name, value)| (name, to_attribute(value)))
                .collect(),
        ),
    }
}

/// Convert a document to a DynamoDB item.
///
/// Attributes named in `string_sets` are written as `SS`; empty sets are
/// omitted since DynamoDB cannot store them.
pub fn to_attributes(item: Item, string_sets: &[&str]) -> Result<Attributes, RepositoryError> {
    let mut attributes = HashMap::with_capacity(item.len());
    for (name, value) in item {
        if !string_sets.contains(&name.as_str()) {
            attributes.insert(name, to_attribute(value));
            continue;
        }
        let members = match value {
            Value::Array(members) => members
                .into_iter()
                .map(|member| match member {
                    Value::String(s) => Ok(s),
                    other => Err(RepositoryError::InvalidData(format!(
                        "Set {name} contains a non-string member: {other}"
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Value::Null => Vec::new(),
            _ => {
                return Err(RepositoryError::InvalidData(format!(
                    "Attribute {name} must be a list of strings"
                )))
            }
        };
        if !members.is_empty() {
            attributes.insert(name, AttributeValue::Ss(members));
        }
    }
    Ok(attributes)
}

/// Convert a primary key to its attribute map.
pub fn key_to_attributes(key: &Key) -> Attributes {
    key.to_item()
        .into_iter()
        .map(|(name, value)| (name, to_attribute(value)))
        .collect()
}

// ============================================================================
// DynamoDB -> JSON
// ============================================================================

fn parse_number(n: &str) -> Result<Value, RepositoryError> {
    if let Ok(i) = n.parse::<i64>() {
        return Ok(Value::from(i));
    }
    n.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| RepositoryError::InvalidData(format!("Invalid number: {n}")))
}

/// Convert an AttributeValue to a JSON value. Sets become arrays.
pub fn from_attribute(value: &AttributeValue) -> Result<Value, RepositoryError> {
    match value {
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::Bool(b) => Ok(Value::Bool(*b)),
        AttributeValue::N(n) => parse_number(n),
        AttributeValue::S(s) => Ok(Value::String(s.clone())),
        AttributeValue::Ss(members) => Ok(Value::Array(
            members.iter().cloned().map(Value::String).collect(),
        )),
        AttributeValue::Ns(members) => members
            .iter()
            .map(|n| parse_number(n))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::L(values) => values
            .iter()
            .map(from_attribute)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::M(map) => from_attributes(map).map(Value::Object),
        other => Err(RepositoryError::InvalidData(format!(
            "Unsupported attribute type: {other:?}"
        ))),
    }
}

/// Convert a DynamoDB item to a document.
pub fn from_attributes(attributes: &Attributes) -> Result<Item, RepositoryError> {
    attributes
        .iter()
        .map(|(name, value)| Ok((name.clone(), from_attribute(value)?)))
        .collect()
}

/// Members of the string set `attribute`, empty when the attribute is absent.
pub fn set_members(attributes: Option<&Attributes>, attribute: &str) -> Vec<String> {
    attributes
        .and_then(|attrs| attrs.get(attribute))
        .and_then(|value| value.as_ss().ok())
        .cloned()
        .unwrap_or_default()
}

/// Applies an `ADD` or `DELETE` of `member` to the set as it was before the update.
pub fn apply_set_update(mut members: Vec<String>, member: &str, add: bool) -> SetUpdate {
    let present = members.iter().any(|m| m == member);
    if add && !present {
        members.push(member.to_string());
    } else if !add {
        members.retain(|m| m != member);
    }
    SetUpdate {
        changed: add != present,
        members,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: Value) -> Item {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_scalars_convert_both_ways() {
        let doc = item(json!({
            "name": "Woven Basket",
            "price": 45.5,
            "availability": 3,
            "featured": true,
            "note": null
        }));
        let attributes = to_attributes(doc.clone(), &[]).unwrap();

        assert_eq!(attributes.get("price"), Some(&AttributeValue::N("45.5".to_string())));
        assert_eq!(attributes.get("availability"), Some(&AttributeValue::N("3".to_string())));
        assert_eq!(from_attributes(&attributes).unwrap(), doc);
    }

    #[test]
    fn test_nested_content_converts_to_map() {
        let doc = item(json!({"content": {"custom": true, "paragraphs": ["One", "Two"]}}));
        let attributes = to_attributes(doc.clone(), &[]).unwrap();

        assert!(matches!(attributes.get("content"), Some(AttributeValue::M(_))));
        assert_eq!(from_attributes(&attributes).unwrap(), doc);
    }

    #[test]
    fn test_string_set_attributes_are_ss() {
        let doc = item(json!({"theme": "coffee", "likes": ["alice", "bob"]}));
        let attributes = to_attributes(doc, &["likes"]).unwrap();

        assert_eq!(
            attributes.get("likes"),
            Some(&AttributeValue::Ss(vec!["alice".to_string(), "bob".to_string()]))
        );
        let back = from_attributes(&attributes).unwrap();
        assert_eq!(back.get("likes"), Some(&json!(["alice", "bob"])));
    }

    #[test]
    fn test_empty_string_set_is_omitted() {
        let doc = item(json!({"theme": "coffee", "likes": []}));
        let attributes = to_attributes(doc, &["likes"]).unwrap();

        assert!(!attributes.contains_key("likes"));
    }

    #[test]
    fn test_non_string_set_member_is_invalid() {
        let doc = item(json!({"likes": [1, 2]}));
        assert!(matches!(
            to_attributes(doc, &["likes"]),
            Err(RepositoryError::InvalidData(_))
        ));
    }

    #[test]
    fn test_key_to_attributes() {
        let key = Key::new("commentId", "c-1").with_sort("createdAt", 42);
        let attributes = key_to_attributes(&key);

        assert_eq!(attributes.get("commentId"), Some(&AttributeValue::S("c-1".to_string())));
        assert_eq!(attributes.get("createdAt"), Some(&AttributeValue::N("42".to_string())));
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        assert!(from_attribute(&AttributeValue::N("forty".to_string())).is_err());
    }

    #[test]
    fn test_set_members() {
        let mut attributes = Attributes::new();
        attributes.insert(
            "likes".to_string(),
            AttributeValue::Ss(vec!["alice".to_string()]),
        );

        assert_eq!(set_members(Some(&attributes), "likes"), vec!["alice"]);
        assert!(set_members(Some(&attributes), "tags").is_empty());
        assert!(set_members(None, "likes").is_empty());
    }

    #[test]
    fn test_apply_set_update_from_previous_members() {
        let before = vec!["alice".to_string(), "bob".to_string()];

        let added = apply_set_update(before.clone(), "carol", true);
        assert!(added.changed);
        assert_eq!(added.members, vec!["alice", "bob", "carol"]);

        let repeated = apply_set_update(before.clone(), "alice", true);
        assert!(!repeated.changed);
        assert_eq!(repeated.members.len(), 2);

        let removed = apply_set_update(before.clone(), "bob", false);
        assert!(removed.changed);
        assert_eq!(removed.members, vec!["alice"]);

        let absent = apply_set_update(before, "dave", false);
        assert!(!absent.changed);
        assert_eq!(absent.members.len(), 2);
    }
}
