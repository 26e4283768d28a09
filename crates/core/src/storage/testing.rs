//! A minimal key-value store for exercising core services in unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{
    DocumentStore, Item, Key, Page, QueryRequest, RepositoryError, Result, ScanRequest,
    SetUpdate, WriteCondition,
};

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Item>>>,
    pub batch_gets: Mutex<Vec<usize>>,
    /// Member another writer adds to the set just before the next set update.
    pub concurrent_member: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn insert(&self, table: &str, item: Item) {
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(item);
    }

    pub fn items(&self, table: &str) -> Vec<Item> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    fn interleave(&self, item: &mut Item, attribute: &str) {
        if let Some(member) = self.concurrent_member.lock().unwrap().take() {
            if let Some(members) = item
                .entry(attribute)
                .or_insert_with(|| Value::Array(vec![]))
                .as_array_mut()
            {
                members.push(Value::from(member));
            }
        }
    }

    fn update<T>(&self, table: &str, key: &Key, f: impl FnOnce(&mut Item) -> T) -> Result<T> {
        let mut tables = self.tables.lock().unwrap();
        let item = tables
            .get_mut(table)
            .and_then(|items| items.iter_mut().find(|item| key.matches(item)))
            .ok_or_else(|| RepositoryError::NotFound {
                entity_type: "Item",
                id: key.to_string(),
            })?;
        Ok(f(item))
    }
}

fn strings(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_item(&self, table: &str, key: &Key) -> Result<Option<Item>> {
        Ok(self.items(table).into_iter().find(|item| key.matches(item)))
    }

    async fn query(&self, _: &str, _: &QueryRequest) -> Result<Page> {
        Err(RepositoryError::QueryFailed("query not supported".to_string()))
    }

    async fn scan(&self, _: &str, _: &ScanRequest) -> Result<Page> {
        Err(RepositoryError::QueryFailed("scan not supported".to_string()))
    }

    async fn batch_get(
        &self,
        table: &str,
        keys: &[Key],
        projection: Option<&[&str]>,
    ) -> Result<Vec<Item>> {
        self.batch_gets.lock().unwrap().push(keys.len());
        let items = self.items(table);
        Ok(keys
            .iter()
            .filter_map(|key| items.iter().find(|item| key.matches(item)))
            .map(|item| match projection {
                Some(attrs) => item
                    .iter()
                    .filter(|(name, _)| attrs.contains(&name.as_str()))
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect(),
                None => item.clone(),
            })
            .collect())
    }

    async fn put_item(&self, table: &str, item: Item, condition: WriteCondition) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        let items = tables.entry(table.to_string()).or_default();
        let exists = items.iter().position(|existing| {
            existing.get("commentId") == item.get("commentId")
                && existing.get("createdAt") == item.get("createdAt")
                && existing.get("theme") == item.get("theme")
        });
        match (exists, condition) {
            (Some(_), WriteCondition::IfNotExists) => Err(RepositoryError::AlreadyExists {
                entity_type: "Item",
                id: String::new(),
            }),
            (Some(index), WriteCondition::Always) => {
                items[index] = item;
                Ok(())
            }
            (None, _) => {
                items.push(item);
                Ok(())
            }
        }
    }

    async fn delete_item(&self, table: &str, key: &Key) -> Result<()> {
        if let Some(items) = self.tables.lock().unwrap().get_mut(table) {
            items.retain(|item| !key.matches(item));
        }
        Ok(())
    }

    async fn add_to_set(&self, table: &str, key: &Key, attribute: &str, member: &str) -> Result<SetUpdate> {
        self.update(table, key, |item| {
            self.interleave(item, attribute);
            let set = item
                .entry(attribute)
                .or_insert_with(|| Value::Array(vec![]));
            let mut changed = false;
            if let Some(members) = set.as_array_mut() {
                if !members.iter().any(|m| m == member) {
                    members.push(Value::from(member));
                    changed = true;
                }
            }
            SetUpdate {
                changed,
                members: strings(item.get(attribute)),
            }
        })
    }

    async fn remove_from_set(
        &self,
        table: &str,
        key: &Key,
        attribute: &str,
        member: &str,
    ) -> Result<SetUpdate> {
        self.update(table, key, |item| {
            self.interleave(item, attribute);
            let changed = match item.get_mut(attribute).and_then(Value::as_array_mut) {
                Some(members) => {
                    let before = members.len();
                    members.retain(|m| m != member);
                    before != members.len()
                }
                None => false,
            };
            SetUpdate {
                changed,
                members: strings(item.get(attribute)),
            }
        })
    }

    async fn append_to_list(&self, table: &str, key: &Key, attribute: &str, value: Value) -> Result<()> {
        self.update(table, key, |item| {
            let list = item
                .entry(attribute)
                .or_insert_with(|| Value::Array(vec![]));
            if let Some(entries) = list.as_array_mut() {
                entries.push(value);
            }
        })
    }
}
