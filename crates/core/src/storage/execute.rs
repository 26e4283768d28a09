use super::{DocumentStore, Item, Page, QueryRequest, Result, ScanRequest};
use crate::query::{Operation, Plan};

/// Rows from one planned operation plus the cursor for the next page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub items: Vec<Item>,
    pub next_cursor: Option<String>,
}

/// A query or scan that can be resumed from a continuation key.
enum Traversal<'a> {
    Query(&'a QueryRequest),
    Scan(&'a ScanRequest),
}

impl Traversal<'_> {
    fn limit(&self) -> Option<u32> {
        match self {
            Self::Query(request) => request.limit,
            Self::Scan(request) => request.limit,
        }
    }

    fn start_key(&self) -> Option<Item> {
        match self {
            Self::Query(request) => request.exclusive_start_key.clone(),
            Self::Scan(request) => request.exclusive_start_key.clone(),
        }
    }

    async fn page(
        &self,
        store: &dyn DocumentStore,
        table: &str,
        exclusive_start_key: Option<Item>,
        limit: Option<u32>,
    ) -> Result<Page> {
        match self {
            Self::Query(request) => {
                let request = QueryRequest {
                    exclusive_start_key,
                    limit,
                    ..(*request).clone()
                };
                store.query(table, &request).await
            }
            Self::Scan(request) => {
                let request = ScanRequest {
                    exclusive_start_key,
                    limit,
                    ..(*request).clone()
                };
                store.scan(table, &request).await
            }
        }
    }
}

/// Dispatches a planned operation to the store.
///
/// The store's limit counts items evaluated before the post-filter, so a
/// filtered traversal keeps following the continuation key until the page
/// holds `limit` matches or the traversal is exhausted.
pub async fn execute(store: &dyn DocumentStore, table: &str, plan: &Plan) -> Result<QueryResult> {
    let traversal = match plan.operation() {
        Operation::GetItem { key, filter } => {
            let items = store
                .get_item(table, key)
                .await?
                .into_iter()
                .filter(|item| filter.as_ref().is_none_or(|f| f.matches(item)))
                .collect();
            return Ok(QueryResult {
                items,
                next_cursor: None,
            });
        }
        Operation::Query(request) => Traversal::Query(request),
        Operation::Scan(request) => Traversal::Scan(request),
    };

    let limit = traversal.limit();
    let mut items = Vec::new();
    let mut start = traversal.start_key();
    loop {
        let remaining = limit.map(|limit| {
            let collected = u32::try_from(items.len()).unwrap_or(u32::MAX);
            limit.saturating_sub(collected).max(1)
        });
        let page = traversal.page(store, table, start, remaining).await?;
        items.extend(page.items);
        start = page.last_evaluated_key;

        let full = limit.is_some_and(|limit| items.len() >= limit as usize);
        if full || start.is_none() {
            break;
        }
    }

    Ok(QueryResult {
        next_cursor: plan.next_cursor(start.as_ref()),
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{plan, EntitySchema, FilterField, FilterKind, Filters, Pagination};
    use crate::storage::{Key, Order, Page, QueryRequest, ScanRequest, SetUpdate, WriteCondition};
    use async_trait::async_trait;
    use serde_json::json;

    const POSTS: EntitySchema = EntitySchema {
        name: "posts",
        partition_key: "theme",
        sort_key: Some("createdAt"),
        index: None,
        order: Order::Ascending,
        filters: &[FilterField::new(
            "productCollection",
            "productCollection",
            FilterKind::Equals,
        )],
    };

    /// Serves one fixed post. Queries report a continuation key on every page;
    /// scans find nothing on the first page and the post on the second.
    struct OnePost;

    fn post() -> Item {
        json!({"theme": "x", "createdAt": 5, "productCollection": "home-living"})
            .as_object()
            .unwrap()
            .clone()
    }

    #[async_trait]
    impl DocumentStore for OnePost {
        async fn get_item(&self, _: &str, key: &Key) -> Result<Option<Item>> {
            Ok(Some(post()).filter(|item| key.matches(item)))
        }
        async fn query(&self, _: &str, _: &QueryRequest) -> Result<Page> {
            Ok(Page {
                items: vec![post()],
                last_evaluated_key: Some(post()),
            })
        }
        async fn scan(&self, _: &str, request: &ScanRequest) -> Result<Page> {
            Ok(match request.exclusive_start_key {
                None => Page {
                    items: vec![],
                    last_evaluated_key: Some(post()),
                },
                Some(_) => Page {
                    items: vec![post()],
                    last_evaluated_key: None,
                },
            })
        }
        async fn batch_get(&self, _: &str, _: &[Key], _: Option<&[&str]>) -> Result<Vec<Item>> {
            Ok(vec![])
        }
        async fn put_item(&self, _: &str, _: Item, _: WriteCondition) -> Result<()> {
            Ok(())
        }
        async fn delete_item(&self, _: &str, _: &Key) -> Result<()> {
            Ok(())
        }
        async fn add_to_set(&self, _: &str, _: &Key, _: &str, _: &str) -> Result<SetUpdate> {
            Ok(SetUpdate::default())
        }
        async fn remove_from_set(&self, _: &str, _: &Key, _: &str, _: &str) -> Result<SetUpdate> {
            Ok(SetUpdate::default())
        }
        async fn append_to_list(
            &self,
            _: &str,
            _: &Key,
            _: &str,
            _: serde_json::Value,
        ) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_point_lookup_applies_post_filter() {
        let filters = Filters::new()
            .with("theme", "x")
            .with("createdAt", 5_i64)
            .with("productCollection", "beauty-wellness");
        let plan = plan(&POSTS, &filters, &Pagination::default()).unwrap();

        let result = execute(&OnePost, "posts", &plan).await.unwrap();
        assert!(result.items.is_empty());
        assert!(result.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_query_returns_cursor_for_continuation() {
        let filters = Filters::new().with("theme", "x");
        let plan = plan(&POSTS, &filters, &Pagination::new(None, Some(1))).unwrap();

        let result = execute(&OnePost, "posts", &plan).await.unwrap();
        assert_eq!(result.items, vec![post()]);
        assert!(result.next_cursor.is_some());
    }

    #[tokio::test]
    async fn test_query_fills_page_across_store_pages() {
        let filters = Filters::new().with("theme", "x");
        let plan = plan(&POSTS, &filters, &Pagination::new(None, Some(3))).unwrap();

        let result = execute(&OnePost, "posts", &plan).await.unwrap();
        assert_eq!(result.items.len(), 3);
        assert!(result.next_cursor.is_some());
    }

    #[tokio::test]
    async fn test_scan_follows_continuation_past_empty_page() {
        let plan = plan(&POSTS, &Filters::new(), &Pagination::default()).unwrap();

        let result = execute(&OnePost, "posts", &plan).await.unwrap();
        assert_eq!(result.items, vec![post()]);
        assert!(result.next_cursor.is_none());
    }
}
