//! DynamoDB document store implementation.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::types::{AttributeValue, KeysAndAttributes, ReturnValue};
use aws_sdk_dynamodb::Client;
use serde_json::Value;

use globalgood_core::storage::{
    DocumentStore, Item, Key, Order, Page, QueryRequest, RepositoryError, Result, ScanRequest,
    SetUpdate, Tables, WriteCondition,
};

use super::conversions::{
    apply_set_update, from_attributes, key_to_attributes, set_members, to_attribute,
    to_attributes, Attributes,
};
use super::error::{
    map_batch_get_error, map_delete_item_error, map_get_item_error, map_put_item_error,
    map_query_error, map_scan_error, map_update_item_error,
};
use super::expressions::Expressions;
use crate::storage::layout::{layouts, TableLayout};

/// Largest number of keys a single BatchGetItem call accepts.
const BATCH_GET_LIMIT: usize = 100;
/// Rounds spent resubmitting keys DynamoDB left unprocessed.
const UNPROCESSED_ROUNDS: usize = 3;
/// Wait before the first resubmission; doubled for each later round.
const UNPROCESSED_BACKOFF: Duration = Duration::from_millis(50);

/// Delay before resubmission round `round` (1-based).
fn unprocessed_backoff(round: usize) -> Duration {
    let exponent = u32::try_from(round.saturating_sub(1)).unwrap_or(u32::MAX);
    UNPROCESSED_BACKOFF.saturating_mul(2_u32.saturating_pow(exponent))
}

/// DynamoDB-based document store.
pub struct DynamoDbStore {
    client: Client,
    layouts: HashMap<String, TableLayout>,
}

impl DynamoDbStore {
    /// Creates a store over `client` for the configured tables.
    pub fn new(client: Client, tables: &Tables) -> Self {
        Self {
            client,
            layouts: layouts(tables),
        }
    }

    /// Creates a store using the AWS SDK default credential chain.
    pub async fn connect(region: &str, tables: &Tables) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        Self::new(Client::new(&config), tables)
    }

    fn layout(&self, table: &str) -> Result<&TableLayout> {
        self.layouts
            .get(table)
            .ok_or_else(|| RepositoryError::QueryFailed(format!("Table not found: {table}")))
    }

    fn page(
        items: Option<Vec<Attributes>>,
        last_evaluated_key: Option<Attributes>,
    ) -> Result<Page> {
        Ok(Page {
            items: items
                .unwrap_or_default()
                .iter()
                .map(from_attributes)
                .collect::<Result<_>>()?,
            last_evaluated_key: last_evaluated_key
                .as_ref()
                .map(from_attributes)
                .transpose()?,
        })
    }

    fn start_key(&self, table: &str, start: Option<&Item>) -> Result<Option<Attributes>> {
        let layout = self.layout(table)?;
        start
            .map(|key| to_attributes(key.clone(), layout.string_sets))
            .transpose()
    }

    /// Runs one set update on an existing item and returns the set as it was before.
    async fn update_set(
        &self,
        table: &str,
        key: &Key,
        action: &str,
        attribute: &str,
        member: &str,
    ) -> Result<Option<Attributes>> {
        let mut expressions = Expressions::new();
        let pk = expressions.name(&key.partition.attribute);
        let set = expressions.name(attribute);
        let value = expressions.attribute_value(AttributeValue::Ss(vec![member.to_string()]));

        let output = self
            .client
            .update_item()
            .table_name(table)
            .set_key(Some(key_to_attributes(key)))
            .update_expression(format!("{action} {set} {value}"))
            .condition_expression(format!("attribute_exists({pk})"))
            .set_expression_attribute_names(expressions.names())
            .set_expression_attribute_values(expressions.values())
            .return_values(ReturnValue::UpdatedOld)
            .send()
            .await
            .map_err(|e| map_update_item_error(e, key.to_string()))?;

        Ok(output.attributes)
    }
}

#[async_trait]
impl DocumentStore for DynamoDbStore {
    async fn get_item(&self, table: &str, key: &Key) -> Result<Option<Item>> {
        let result = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(key_to_attributes(key)))
            .send()
            .await
            .map_err(map_get_item_error)?;

        result.item.as_ref().map(from_attributes).transpose()
    }

    async fn query(&self, table: &str, request: &QueryRequest) -> Result<Page> {
        let mut expressions = Expressions::new();
        let key_condition = expressions.key_condition(&request.partition, request.sort.as_ref());
        let filter = request.filter.as_ref().map(|f| expressions.condition(f));

        let result = self
            .client
            .query()
            .table_name(table)
            .set_index_name(request.index.clone())
            .key_condition_expression(key_condition)
            .set_filter_expression(filter)
            .set_expression_attribute_names(expressions.names())
            .set_expression_attribute_values(expressions.values())
            .scan_index_forward(request.order == Order::Ascending)
            .set_limit(request.limit.map(|limit| limit as i32))
            .set_exclusive_start_key(
                self.start_key(table, request.exclusive_start_key.as_ref())?,
            )
            .send()
            .await
            .map_err(map_query_error)?;

        Self::page(result.items, result.last_evaluated_key)
    }

    async fn scan(&self, table: &str, request: &ScanRequest) -> Result<Page> {
        let mut expressions = Expressions::new();
        let filter = request.filter.as_ref().map(|f| expressions.condition(f));

        let result = self
            .client
            .scan()
            .table_name(table)
            .set_filter_expression(filter)
            .set_expression_attribute_names(expressions.names())
            .set_expression_attribute_values(expressions.values())
            .set_limit(request.limit.map(|limit| limit as i32))
            .set_exclusive_start_key(
                self.start_key(table, request.exclusive_start_key.as_ref())?,
            )
            .send()
            .await
            .map_err(map_scan_error)?;

        Self::page(result.items, result.last_evaluated_key)
    }

    async fn batch_get(
        &self,
        table: &str,
        keys: &[Key],
        projection: Option<&[&str]>,
    ) -> Result<Vec<Item>> {
        let mut items = Vec::with_capacity(keys.len());

        for chunk in keys.chunks(BATCH_GET_LIMIT) {
            let mut expressions = Expressions::new();
            let projection = projection.map(|attrs| expressions.projection(attrs));
            let mut request = Some(
                KeysAndAttributes::builder()
                    .set_keys(Some(chunk.iter().map(key_to_attributes).collect()))
                    .set_projection_expression(projection)
                    .set_expression_attribute_names(expressions.names())
                    .build()
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
            );

            let mut rounds = 0;
            while let Some(keys_and_attributes) = request.take() {
                if rounds == UNPROCESSED_ROUNDS {
                    return Err(RepositoryError::QueryFailed(
                        "BatchGetItem left keys unprocessed".to_string(),
                    ));
                }
                if rounds > 0 {
                    let delay = unprocessed_backoff(rounds);
                    tracing::debug!(table, round = rounds, ?delay, "Resubmitting unprocessed keys");
                    tokio::time::sleep(delay).await;
                }
                rounds += 1;

                let result = self
                    .client
                    .batch_get_item()
                    .request_items(table, keys_and_attributes)
                    .send()
                    .await
                    .map_err(map_batch_get_error)?;

                if let Some(found) = result.responses.and_then(|mut r| r.remove(table)) {
                    for attributes in &found {
                        items.push(from_attributes(attributes)?);
                    }
                }
                request = result
                    .unprocessed_keys
                    .and_then(|mut pending| pending.remove(table))
                    .filter(|pending| !pending.keys.is_empty());
            }
        }

        Ok(items)
    }

    async fn put_item(&self, table: &str, item: Item, condition: WriteCondition) -> Result<()> {
        let layout = self.layout(table)?;
        let id = layout
            .key_of(&item)
            .map(|key| key.to_string())
            .ok_or_else(|| {
                RepositoryError::InvalidData("Item is missing a key attribute".to_string())
            })?;

        let mut expressions = Expressions::new();
        let condition_expression = match condition {
            WriteCondition::Always => None,
            WriteCondition::IfNotExists => Some(format!(
                "attribute_not_exists({})",
                expressions.name(layout.partition_key)
            )),
        };

        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(to_attributes(item, layout.string_sets)?))
            .set_condition_expression(condition_expression)
            .set_expression_attribute_names(expressions.names())
            .send()
            .await
            .map_err(|e| map_put_item_error(e, id))?;

        Ok(())
    }

    async fn delete_item(&self, table: &str, key: &Key) -> Result<()> {
        self.client
            .delete_item()
            .table_name(table)
            .set_key(Some(key_to_attributes(key)))
            .send()
            .await
            .map_err(map_delete_item_error)?;

        Ok(())
    }

    async fn add_to_set(
        &self,
        table: &str,
        key: &Key,
        attribute: &str,
        member: &str,
    ) -> Result<SetUpdate> {
        let before = self.update_set(table, key, "ADD", attribute, member).await?;
        Ok(apply_set_update(
            set_members(before.as_ref(), attribute),
            member,
            true,
        ))
    }

    async fn remove_from_set(
        &self,
        table: &str,
        key: &Key,
        attribute: &str,
        member: &str,
    ) -> Result<SetUpdate> {
        let before = self
            .update_set(table, key, "DELETE", attribute, member)
            .await?;
        Ok(apply_set_update(
            set_members(before.as_ref(), attribute),
            member,
            false,
        ))
    }

    async fn append_to_list(
        &self,
        table: &str,
        key: &Key,
        attribute: &str,
        value: Value,
    ) -> Result<()> {
        let mut expressions = Expressions::new();
        let pk = expressions.name(&key.partition.attribute);
        let list = expressions.name(attribute);
        let empty = expressions.attribute_value(AttributeValue::L(Vec::new()));
        let appended = expressions.attribute_value(AttributeValue::L(vec![to_attribute(value)]));

        self.client
            .update_item()
            .table_name(table)
            .set_key(Some(key_to_attributes(key)))
            .update_expression(format!(
                "SET {list} = list_append(if_not_exists({list}, {empty}), {appended})"
            ))
            .condition_expression(format!("attribute_exists({pk})"))
            .set_expression_attribute_names(expressions.names())
            .set_expression_attribute_values(expressions.values())
            .send()
            .await
            .map_err(|e| map_update_item_error(e, key.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unprocessed_backoff_doubles_per_round() {
        assert_eq!(unprocessed_backoff(1), Duration::from_millis(50));
        assert_eq!(unprocessed_backoff(2), Duration::from_millis(100));
        assert_eq!(unprocessed_backoff(3), Duration::from_millis(200));
    }
}
