//! Rendering of conditions into DynamoDB expression strings.
//!
//! Attribute names and values never appear inline: every name becomes a
//! `#nN` placeholder and every value a `:vN` placeholder.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use globalgood_core::query::{Condition, SortKeyCondition};
use globalgood_core::storage::KeyPart;
use serde_json::Value;

use super::conversions::to_attribute;

/// Collects placeholders while expressions are rendered.
#[derive(Debug, Default)]
pub struct Expressions {
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
}

impl Expressions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholder for an attribute name. The same name reuses its placeholder.
    pub fn name(&mut self, attribute: &str) -> String {
        if let Some((placeholder, _)) = self.names.iter().find(|(_, name)| *name == attribute) {
            return placeholder.clone();
        }
        let placeholder = format!("#n{}", self.names.len());
        self.names.insert(placeholder.clone(), attribute.to_string());
        placeholder
    }

    /// Placeholder for a value.
    pub fn value(&mut self, value: &Value) -> String {
        self.attribute_value(to_attribute(value.clone()))
    }

    /// Placeholder for an already converted value.
    pub fn attribute_value(&mut self, value: AttributeValue) -> String {
        let placeholder = format!(":v{}", self.values.len());
        self.values.insert(placeholder.clone(), value);
        placeholder
    }

    /// Key condition for a query on `partition`, optionally narrowed on the sort key.
    pub fn key_condition(
        &mut self,
        partition: &KeyPart,
        sort: Option<&(String, SortKeyCondition)>,
    ) -> String {
        let pk = self.name(&partition.attribute);
        let pv = self.value(&partition.value);
        let mut expression = format!("{pk} = {pv}");

        if let Some((attribute, condition)) = sort {
            let sk = self.name(attribute);
            let rendered = match condition {
                SortKeyCondition::Equals(v) => format!("{sk} = {}", self.value(v)),
                SortKeyCondition::AtMost(v) => format!("{sk} <= {}", self.value(v)),
                SortKeyCondition::AtLeast(v) => format!("{sk} >= {}", self.value(v)),
                SortKeyCondition::Between(lower, upper) => {
                    let lower = self.value(lower);
                    let upper = self.value(upper);
                    format!("{sk} BETWEEN {lower} AND {upper}")
                }
            };
            expression.push_str(" AND ");
            expression.push_str(&rendered);
        }
        expression
    }

    /// Filter or condition expression for a predicate.
    pub fn condition(&mut self, condition: &Condition) -> String {
        match condition {
            Condition::Equals { attribute, value } => self.comparison(attribute, "=", value),
            Condition::AtMost { attribute, value } => self.comparison(attribute, "<=", value),
            Condition::AtLeast { attribute, value } => self.comparison(attribute, ">=", value),
            Condition::GreaterThan { attribute, value } => self.comparison(attribute, ">", value),
            Condition::OneOf { attribute, values } => {
                let name = self.name(attribute);
                let placeholders: Vec<String> = values.iter().map(|v| self.value(v)).collect();
                format!("{name} IN ({})", placeholders.join(", "))
            }
            Condition::Contains { attribute, value } => {
                let name = self.name(attribute);
                let value = self.attribute_value(AttributeValue::S(value.clone()));
                format!("contains({name}, {value})")
            }
            Condition::And(conditions) => conditions
                .iter()
                .map(|c| format!("({})", self.condition(c)))
                .collect::<Vec<_>>()
                .join(" AND "),
        }
    }

    fn comparison(&mut self, attribute: &str, operator: &str, value: &Value) -> String {
        let name = self.name(attribute);
        let value = self.value(value);
        format!("{name} {operator} {value}")
    }

    /// Projection expression listing `attributes`.
    pub fn projection(&mut self, attributes: &[&str]) -> String {
        attributes
            .iter()
            .map(|attribute| self.name(attribute))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Name placeholders, or `None` when no name was rendered.
    pub fn names(&self) -> Option<HashMap<String, String>> {
        (!self.names.is_empty()).then(|| self.names.clone())
    }

    /// Value placeholders, or `None` when no value was rendered.
    pub fn values(&self) -> Option<HashMap<String, AttributeValue>> {
        (!self.values.is_empty()).then(|| self.values.clone())
    }
}
