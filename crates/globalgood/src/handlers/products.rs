//! Product catalogue handlers.
//!
//! Listing, search and lookups all go through the query planner, so the
//! cheapest store operation is chosen from whichever filters are present.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use globalgood_core::catalog::{schemas, Collection, ValidationError};
use globalgood_core::query::{plan, Filters, Operation, Pagination};
use globalgood_core::storage::{execute, Item, Key, RepositoryError};

use crate::{
    handlers::AppError,
    models::{ListResponse, ProductsQuery, SearchQuery},
    state::AppState,
};

/// Attributes returned by a batch fetch.
const BATCH_PROJECTION: &[&str] = &["collection", "name", "price", "img"];

/// List products (GET /products).
///
/// With `products=collection:name,...` the listed products are fetched in one
/// batch instead.
#[axum::debug_handler]
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ProductsQuery>, QueryRejection>,
) -> Result<Json<ListResponse<Item>>, AppError> {
    let Query(query) = query?;

    if let Some(pairs) = query.product_keys()? {
        let keys: Vec<Key> = pairs
            .iter()
            .map(|(collection, name)| {
                Key::new("collection", collection.as_str()).with_sort("name", name.as_str())
            })
            .collect();
        let items = state
            .store
            .batch_get(&state.tables().products, &keys, Some(BATCH_PROJECTION))
            .await?;

        tracing::debug!(requested = keys.len(), found = items.len(), "Batch product fetch");
        return Ok(Json(ListResponse::new(items, None)));
    }

    let plan = plan(&schemas::PRODUCTS, &query.filters(), &query.pagination())?;
    let result = execute(&*state.store, &state.tables().products, &plan).await?;

    Ok(Json(ListResponse::new(result.items, result.next_cursor)))
}

/// Search products by name (GET /products/search?q=).
#[axum::debug_handler]
pub async fn search_products(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<ListResponse<Item>>, AppError> {
    let Query(query) = query?;
    let q = query.q.ok_or(ValidationError::Required("q"))?;

    let filters = Filters::new().with("q", q);
    let plan = plan(
        &schemas::PRODUCTS,
        &filters,
        &Pagination::new(query.cursor, query.limit),
    )?;
    let result = execute(&*state.store, &state.tables().products, &plan).await?;

    Ok(Json(ListResponse::new(result.items, result.next_cursor)))
}

/// Get the first product with this name (GET /product/{name}).
#[axum::debug_handler]
pub async fn get_product_by_name(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Item>, AppError> {
    let Path(name) = path?;

    let filters = Filters::new().with("name", name.as_str());
    let plan = plan(
        &schemas::PRODUCTS_BY_NAME,
        &filters,
        &Pagination::new(None, Some(1)),
    )?;
    let result = execute(&*state.store, &state.tables().products, &plan).await?;

    let product = result
        .items
        .into_iter()
        .next()
        .ok_or(RepositoryError::NotFound {
            entity_type: "Product",
            id: name,
        })?;
    Ok(Json(product))
}

/// Get a product by its full key (GET /product/{collection}/{name}).
#[axum::debug_handler]
pub async fn get_product(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<Item>, AppError> {
    let Path((collection, name)) = path?;
    let collection: Collection = collection.parse()?;

    let filters = Filters::new()
        .with("collection", collection.as_str())
        .with("name", name);
    let plan = plan(&schemas::PRODUCTS, &filters, &Pagination::default())?;
    let result = execute(&*state.store, &state.tables().products, &plan).await?;

    let id = match plan.operation() {
        Operation::GetItem { key, .. } => key.to_string(),
        _ => collection.to_string(),
    };
    let product = result
        .items
        .into_iter()
        .next()
        .ok_or(RepositoryError::NotFound {
            entity_type: "Product",
            id,
        })?;
    Ok(Json(product))
}
