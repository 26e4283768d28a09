use std::cmp::Ordering;

use serde_json::Value;

use crate::storage::Item;

/// A filter predicate evaluated by the store after key matching.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Equals { attribute: String, value: Value },
    AtMost { attribute: String, value: Value },
    AtLeast { attribute: String, value: Value },
    GreaterThan { attribute: String, value: Value },
    /// Attribute value is a member of the given set.
    OneOf { attribute: String, values: Vec<Value> },
    /// Substring match on strings, element match on lists and sets.
    Contains { attribute: String, value: String },
    And(Vec<Condition>),
}

impl Condition {
    /// Combines conditions with logical AND.
    ///
    /// Returns `None` for an empty list and the condition itself for a single one.
    pub fn all(mut conditions: Vec<Condition>) -> Option<Condition> {
        match conditions.len() {
            0 => None,
            1 => conditions.pop(),
            _ => Some(Condition::And(conditions)),
        }
    }

    /// Evaluates the predicate against an item. Missing attributes never match.
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Condition::Equals { attribute, value } => {
                item.get(attribute).is_some_and(|v| values_equal(v, value))
            }
            Condition::AtMost { attribute, value } => {
                compare_attr(item, attribute, value).is_some_and(Ordering::is_le)
            }
            Condition::AtLeast { attribute, value } => {
                compare_attr(item, attribute, value).is_some_and(Ordering::is_ge)
            }
            Condition::GreaterThan { attribute, value } => {
                compare_attr(item, attribute, value).is_some_and(Ordering::is_gt)
            }
            Condition::OneOf { attribute, values } => item
                .get(attribute)
                .is_some_and(|v| values.iter().any(|candidate| values_equal(v, candidate))),
            Condition::Contains { attribute, value } => match item.get(attribute) {
                Some(Value::String(s)) => s.contains(value.as_str()),
                Some(Value::Array(elements)) => {
                    elements.iter().any(|e| e.as_str() == Some(value.as_str()))
                }
                _ => false,
            },
            Condition::And(conditions) => conditions.iter().all(|c| c.matches(item)),
        }
    }
}

/// A condition on the sort key of a range query.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKeyCondition {
    Equals(Value),
    AtMost(Value),
    AtLeast(Value),
    Between(Value, Value),
}

impl SortKeyCondition {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            SortKeyCondition::Equals(expected) => values_equal(value, expected),
            SortKeyCondition::AtMost(upper) => {
                compare_values(value, upper).is_some_and(Ordering::is_le)
            }
            SortKeyCondition::AtLeast(lower) => {
                compare_values(value, lower).is_some_and(Ordering::is_ge)
            }
            SortKeyCondition::Between(lower, upper) => {
                compare_values(value, lower).is_some_and(Ordering::is_ge)
                    && compare_values(value, upper).is_some_and(Ordering::is_le)
            }
        }
    }
}

fn compare_attr(item: &Item, attribute: &str, value: &Value) -> Option<Ordering> {
    compare_values(item.get(attribute)?, value)
}

/// Orders two scalar values the way the store does: numbers numerically,
/// strings lexicographically. Mixed or non-scalar values are unordered.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) if x == y => Some(Ordering::Equal),
        _ => None,
    }
}

/// Equality with numeric normalisation (`5` equals `5.0`).
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => compare_values(a, b) == Some(Ordering::Equal),
        _ => a == b,
    }
}
