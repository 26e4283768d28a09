use std::fmt;

use serde_json::{Map, Value};

use crate::query::{Condition, SortKeyCondition};

/// A stored document: attribute name to JSON value.
pub type Item = Map<String, Value>;

/// One component of a primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPart {
    pub attribute: String,
    pub value: Value,
}

impl KeyPart {
    pub fn new(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// Full primary key of an item: partition key plus optional sort key.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    pub partition: KeyPart,
    pub sort: Option<KeyPart>,
}

impl Key {
    /// Creates a key with only a partition component.
    pub fn new(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            partition: KeyPart::new(attribute, value),
            sort: None,
        }
    }

    /// Adds a sort-key component.
    pub fn with_sort(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.sort = Some(KeyPart::new(attribute, value));
        self
    }

    /// Extracts the key attributes named by `partition_key`/`sort_key` from an item.
    ///
    /// Returns `None` when a key attribute is missing.
    pub fn from_item(item: &Item, partition_key: &str, sort_key: Option<&str>) -> Option<Self> {
        let partition = KeyPart::new(partition_key, item.get(partition_key)?.clone());
        let sort = match sort_key {
            Some(attr) => Some(KeyPart::new(attr, item.get(attr)?.clone())),
            None => None,
        };
        Some(Self { partition, sort })
    }

    /// The key as a document containing only the key attributes.
    pub fn to_item(&self) -> Item {
        let mut item = Item::new();
        item.insert(self.partition.attribute.clone(), self.partition.value.clone());
        if let Some(sort) = &self.sort {
            item.insert(sort.attribute.clone(), sort.value.clone());
        }
        item
    }

    /// Returns true if `item` carries exactly this key.
    pub fn matches(&self, item: &Item) -> bool {
        let part_matches = |part: &KeyPart| {
            item.get(&part.attribute)
                .is_some_and(|v| crate::query::values_equal(v, &part.value))
        };
        part_matches(&self.partition) && self.sort.as_ref().is_none_or(part_matches)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}",
            self.partition.attribute,
            display_value(&self.partition.value)
        )?;
        if let Some(sort) = &self.sort {
            write!(f, ", {}={}", sort.attribute, display_value(&sort.value))?;
        }
        Ok(())
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Result ordering on the sort key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    #[default]
    Ascending,
    Descending,
}

/// A range query against one partition.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    /// Secondary index to query instead of the base table.
    pub index: Option<String>,
    pub partition: KeyPart,
    /// Sort-key attribute name and condition.
    pub sort: Option<(String, SortKeyCondition)>,
    /// Post-filter evaluated by the store after key matching.
    pub filter: Option<Condition>,
    pub order: Order,
    pub limit: Option<u32>,
    pub exclusive_start_key: Option<Item>,
}

/// A full-collection traversal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanRequest {
    pub filter: Option<Condition>,
    pub limit: Option<u32>,
    pub exclusive_start_key: Option<Item>,
}

/// One page of results from a query or scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Item>,
    /// Continuation key; `None` when the traversal is exhausted.
    pub last_evaluated_key: Option<Item>,
}

/// Outcome of an atomic set add or remove.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetUpdate {
    /// `false` when the member was already in the requested state.
    pub changed: bool,
    /// The set as this update left it.
    pub members: Vec<String>,
}

/// Precondition for a put.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteCondition {
    /// Unconditional overwrite.
    #[default]
    Always,
    /// Fail with `AlreadyExists` when an item with the same key exists.
    IfNotExists,
}

/// Table names, injected from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tables {
    pub products: String,
    pub reviews: String,
    pub blog_posts: String,
    pub comments: String,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            products: "TheGlobalGood-Products".to_string(),
            reviews: "TheGlobalGood-Reviews".to_string(),
            blog_posts: "TheGlobalGood-BlogPosts".to_string(),
            comments: "TheGlobalGood-BlogPostComments".to_string(),
        }
    }
}
