//! Product review handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use globalgood_auth::CurrentUser;
use globalgood_core::catalog::{
    schemas, to_item, Collection, CreateReviewRequest, Review, ValidationError,
};
use globalgood_core::query::{plan, Filters, Pagination};
use globalgood_core::storage::{execute, Item, WriteCondition};

use crate::{
    handlers::AppError,
    models::{ListResponse, PageQuery, ReviewsByAuthorQuery},
    state::AppState,
};

/// Reviews returned per author when no limit is given.
const DEFAULT_AUTHOR_REVIEWS: u32 = 5;

fn product_path(collection: &str, name: &str) -> Result<Collection, ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required("name"));
    }
    collection.parse()
}

/// Review a product (POST /product/{collection}/{name}/review).
#[axum::debug_handler]
pub async fn create_review(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    payload: Result<Json<CreateReviewRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let Path((collection, name)) = path?;
    let collection = product_path(&collection, &name)?;
    let Json(payload) = payload?;
    payload.validate()?;

    let review = payload.into_review(name, collection, user.username);
    state
        .store
        .put_item(
            &state.tables().reviews,
            to_item(&review)?,
            WriteCondition::IfNotExists,
        )
        .await?;

    tracing::info!(
        product = %review.product_name,
        username = %review.username,
        rating = review.rating,
        "Created review"
    );
    Ok((StatusCode::CREATED, Json(review)))
}

/// List the reviews of a product (GET /product/{collection}/{name}/reviews).
#[axum::debug_handler]
pub async fn list_reviews(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<ListResponse<Item>>, AppError> {
    let Path((collection, name)) = path?;
    product_path(&collection, &name)?;
    let Query(query) = query?;

    let filters = Filters::new().with("productName", name);
    let plan = plan(&schemas::REVIEWS, &filters, &query.pagination())?;
    let result = execute(&*state.store, &state.tables().reviews, &plan).await?;

    Ok(Json(ListResponse::new(result.items, result.next_cursor)))
}

/// List reviews written by a user, newest first (GET /reviews/username?username=).
#[axum::debug_handler]
pub async fn list_reviews_by_author(
    State(state): State<AppState>,
    query: Result<Query<ReviewsByAuthorQuery>, QueryRejection>,
) -> Result<Json<ListResponse<Item>>, AppError> {
    let Query(query) = query?;
    let username = query.username.ok_or(ValidationError::Required("username"))?;

    let filters = Filters::new().with("username", username);
    let pagination = Pagination::new(
        query.cursor,
        Some(query.limit.unwrap_or(DEFAULT_AUTHOR_REVIEWS)),
    );
    let plan = plan(&schemas::REVIEWS_BY_AUTHOR, &filters, &pagination)?;
    let result = execute(&*state.store, &state.tables().reviews, &plan).await?;

    Ok(Json(ListResponse::new(result.items, result.next_cursor)))
}
