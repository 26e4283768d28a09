//! In-memory document store implementation.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use globalgood_core::query::{compare_values, values_equal, Condition};
use globalgood_core::storage::{
    DocumentStore, Item, Key, Order, Page, QueryRequest, RepositoryError, Result, ScanRequest,
    SetUpdate, Tables, WriteCondition,
};

use crate::storage::layout::{layouts, TableLayout};

#[derive(Debug)]
struct Table {
    layout: TableLayout,
    items: Vec<Item>,
}

/// In-memory storage backend.
///
/// Uses a HashMap of tables wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Clones share the same tables.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<HashMap<String, Table>>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(&Tables::default())
    }
}

impl InMemoryStore {
    /// Creates an empty store with the four service tables.
    pub fn new(tables: &Tables) -> Self {
        let tables = layouts(tables)
            .into_iter()
            .map(|(name, layout)| {
                (
                    name,
                    Table {
                        layout,
                        items: Vec::new(),
                    },
                )
            })
            .collect();
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }
}

fn table_not_found(name: &str) -> RepositoryError {
    RepositoryError::QueryFailed(format!("Table not found: {name}"))
}

fn item_not_found(key: &Key) -> RepositoryError {
    RepositoryError::NotFound {
        entity_type: "Item",
        id: key.to_string(),
    }
}

/// Orders two items by the given attributes in turn. Missing values sort first.
fn compare_positions(a: &Item, b: &Item, attributes: &[&str]) -> Ordering {
    attributes
        .iter()
        .map(|attr| match (a.get(*attr), b.get(*attr)) {
            (Some(x), Some(y)) => compare_values(x, y).unwrap_or(Ordering::Equal),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn project(item: &Item, attributes: &[&str]) -> Item {
    item.iter()
        .filter(|(name, _)| attributes.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Applies the exclusive start key and the limit to ordered candidates, then the filter.
fn set_members(members: &[Value]) -> Vec<String> {
    members
        .iter()
        .filter_map(|m| m.as_str().map(str::to_string))
        .collect()
}

fn paginate(
    candidates: &[&Item],
    positions: &[&str],
    order: Order,
    filter: Option<&Condition>,
    limit: Option<u32>,
    exclusive_start_key: Option<&Item>,
) -> Page {
    let start = exclusive_start_key.map_or(0, |start| {
        candidates
            .iter()
            .position(|item| {
                let ordering = compare_positions(item, start, positions);
                match order {
                    Order::Ascending => ordering.is_gt(),
                    Order::Descending => ordering.is_lt(),
                }
            })
            .unwrap_or(candidates.len())
    });

    let remaining = &candidates[start..];
    let take = limit.map_or(remaining.len(), |limit| (limit as usize).min(remaining.len()));
    let evaluated = &remaining[..take];

    let last_evaluated_key = if remaining.len() > evaluated.len() {
        evaluated.last().map(|item| project(item, positions))
    } else {
        None
    };

    Page {
        items: evaluated
            .iter()
            .filter(|item| filter.is_none_or(|f| f.matches(item)))
            .map(|item| (*item).clone())
            .collect(),
        last_evaluated_key,
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get_item(&self, table: &str, key: &Key) -> Result<Option<Item>> {
        let tables = self.tables.read().await;
        let table = tables.get(table).ok_or_else(|| table_not_found(table))?;
        Ok(table.items.iter().find(|item| key.matches(item)).cloned())
    }

    async fn query(&self, table: &str, request: &QueryRequest) -> Result<Page> {
        let tables = self.tables.read().await;
        let table = tables.get(table).ok_or_else(|| table_not_found(table))?;

        let index = match &request.index {
            Some(name) => Some(table.layout.index(name).ok_or_else(|| {
                RepositoryError::QueryFailed(format!("Index not found: {name}"))
            })?),
            None => None,
        };
        let positions = table.layout.position_attributes(index);

        let mut candidates: Vec<&Item> = table
            .items
            .iter()
            .filter(|item| {
                item.get(&request.partition.attribute)
                    .is_some_and(|v| values_equal(v, &request.partition.value))
            })
            .filter(|item| match &request.sort {
                Some((attribute, condition)) => {
                    item.get(attribute).is_some_and(|v| condition.matches(v))
                }
                None => true,
            })
            .collect();
        candidates.sort_by(|a, b| compare_positions(a, b, &positions));
        if request.order == Order::Descending {
            candidates.reverse();
        }

        Ok(paginate(
            &candidates,
            &positions,
            request.order,
            request.filter.as_ref(),
            request.limit,
            request.exclusive_start_key.as_ref(),
        ))
    }

    async fn scan(&self, table: &str, request: &ScanRequest) -> Result<Page> {
        let tables = self.tables.read().await;
        let table = tables.get(table).ok_or_else(|| table_not_found(table))?;
        let positions = table.layout.position_attributes(None);

        let mut candidates: Vec<&Item> = table.items.iter().collect();
        candidates.sort_by(|a, b| compare_positions(a, b, &positions));

        Ok(paginate(
            &candidates,
            &positions,
            Order::Ascending,
            request.filter.as_ref(),
            request.limit,
            request.exclusive_start_key.as_ref(),
        ))
    }

    async fn batch_get(
        &self,
        table: &str,
        keys: &[Key],
        projection: Option<&[&str]>,
    ) -> Result<Vec<Item>> {
        let tables = self.tables.read().await;
        let table = tables.get(table).ok_or_else(|| table_not_found(table))?;

        Ok(keys
            .iter()
            .filter_map(|key| table.items.iter().find(|item| key.matches(item)))
            .map(|item| match projection {
                Some(attributes) => project(item, attributes),
                None => item.clone(),
            })
            .collect())
    }

    async fn put_item(&self, table: &str, mut item: Item, condition: WriteCondition) -> Result<()> {
        let mut tables = self.tables.write().await;
        let table = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;
        let key = table.layout.key_of(&item).ok_or_else(|| {
            RepositoryError::InvalidData("Item is missing a key attribute".to_string())
        })?;
        for attribute in table.layout.string_sets {
            if item
                .get(*attribute)
                .and_then(Value::as_array)
                .is_some_and(Vec::is_empty)
            {
                item.remove(*attribute);
            }
        }

        match table.items.iter().position(|existing| key.matches(existing)) {
            Some(_) if condition == WriteCondition::IfNotExists => {
                Err(RepositoryError::AlreadyExists {
                    entity_type: "Item",
                    id: key.to_string(),
                })
            }
            Some(index) => {
                table.items[index] = item;
                Ok(())
            }
            None => {
                table.items.push(item);
                Ok(())
            }
        }
    }

    async fn delete_item(&self, table: &str, key: &Key) -> Result<()> {
        let mut tables = self.tables.write().await;
        let table = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;
        table.items.retain(|item| !key.matches(item));
        Ok(())
    }

    async fn add_to_set(
        &self,
        table: &str,
        key: &Key,
        attribute: &str,
        member: &str,
    ) -> Result<SetUpdate> {
        let mut tables = self.tables.write().await;
        let table = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;
        let item = table
            .items
            .iter_mut()
            .find(|item| key.matches(item))
            .ok_or_else(|| item_not_found(key))?;

        let set = item
            .entry(attribute)
            .or_insert_with(|| Value::Array(Vec::new()));
        let Some(members) = set.as_array_mut() else {
            return Err(RepositoryError::InvalidData(format!(
                "Attribute {attribute} is not a set"
            )));
        };
        let changed = !members.iter().any(|m| m == member);
        if changed {
            members.push(Value::from(member));
        }

        Ok(SetUpdate {
            changed,
            members: set_members(members),
        })
    }

    async fn remove_from_set(
        &self,
        table: &str,
        key: &Key,
        attribute: &str,
        member: &str,
    ) -> Result<SetUpdate> {
        let mut tables = self.tables.write().await;
        let table = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;
        let item = table
            .items
            .iter_mut()
            .find(|item| key.matches(item))
            .ok_or_else(|| item_not_found(key))?;

        let Some(members) = item.get_mut(attribute).and_then(Value::as_array_mut) else {
            return Ok(SetUpdate::default());
        };
        let before = members.len();
        members.retain(|m| m != member);
        let update = SetUpdate {
            changed: members.len() != before,
            members: set_members(members),
        };

        // Sets are never stored empty.
        if update.members.is_empty() {
            item.remove(attribute);
        }
        Ok(update)
    }

    async fn append_to_list(
        &self,
        table: &str,
        key: &Key,
        attribute: &str,
        value: Value,
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        let table = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;
        let item = table
            .items
            .iter_mut()
            .find(|item| key.matches(item))
            .ok_or_else(|| item_not_found(key))?;

        match item
            .entry(attribute)
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            Value::Array(entries) => {
                entries.push(value);
                Ok(())
            }
            _ => Err(RepositoryError::InvalidData(format!(
                "Attribute {attribute} is not a list"
            ))),
        }
    }
}
