use async_trait::async_trait;

use super::{Item, Key, Page, QueryRequest, Result, ScanRequest, SetUpdate, WriteCondition};

/// The document store primitives the services are built on.
///
/// Implementations never retry; a failed call surfaces as a [`super::RepositoryError`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches a single item by its full primary key.
    async fn get_item(&self, table: &str, key: &Key) -> Result<Option<Item>>;

    /// Runs a range query on one partition.
    async fn query(&self, table: &str, request: &QueryRequest) -> Result<Page>;

    /// Traverses the whole table, applying the filter after reading.
    async fn scan(&self, table: &str, request: &ScanRequest) -> Result<Page>;

    /// Fetches many items by key. Keys with no item are omitted from the result.
    ///
    /// When `projection` is given only those attributes are returned.
    async fn batch_get(
        &self,
        table: &str,
        keys: &[Key],
        projection: Option<&[&str]>,
    ) -> Result<Vec<Item>>;

    /// Writes a whole item.
    async fn put_item(&self, table: &str, item: Item, condition: WriteCondition) -> Result<()>;

    /// Deletes an item. Deleting a missing item is not an error.
    async fn delete_item(&self, table: &str, key: &Key) -> Result<()>;

    /// Atomically adds `member` to the string set `attribute` of an existing item.
    ///
    /// Reports no change when the member was already present.
    async fn add_to_set(&self, table: &str, key: &Key, attribute: &str, member: &str)
        -> Result<SetUpdate>;

    /// Atomically removes `member` from the string set `attribute` of an existing item.
    ///
    /// Reports no change when the member was not present.
    async fn remove_from_set(
        &self,
        table: &str,
        key: &Key,
        attribute: &str,
        member: &str,
    ) -> Result<SetUpdate>;

    /// Atomically appends `value` to the list `attribute` of an existing item.
    ///
    /// Fails with `NotFound` when the item does not exist.
    async fn append_to_list(
        &self,
        table: &str,
        key: &Key,
        attribute: &str,
        value: serde_json::Value,
    ) -> Result<()>;
}
