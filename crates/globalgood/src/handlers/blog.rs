//! Blog post handlers.
//!
//! Reads accept an optional bearer token so the `liked` flag can be
//! personalised. Creating and deleting posts requires the admin group.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use globalgood_auth::{AdminUser, CurrentUser, OptionalUser};
use globalgood_core::catalog::{
    from_item, post_key, schemas, to_item, BlogPost, BlogPostView, CreateBlogPostRequest,
};
use globalgood_core::query::{plan, Operation};
use globalgood_core::relations::MembershipChange;
use globalgood_core::storage::{execute, RepositoryError, WriteCondition};

use crate::{
    handlers::AppError,
    models::{BlogQuery, DeleteBlogPostQuery, LikeResponse, ListResponse, MessageResponse},
    state::AppState,
};

/// Get or list blog posts (GET /blog).
///
/// `theme` plus `createdAt` returns that single post in full (404 if absent).
/// Anything else returns a page of posts, without content unless
/// `fullPost=true`.
#[axum::debug_handler]
pub async fn list_blog_posts(
    OptionalUser(viewer): OptionalUser,
    State(state): State<AppState>,
    query: Result<Query<BlogQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    let viewer = viewer.as_ref().map(|identity| identity.username.as_str());

    let plan = plan(&schemas::BLOG_POSTS, &query.filters(), &query.pagination())?;
    let result = execute(&*state.store, &state.tables().blog_posts, &plan).await?;

    if let Operation::GetItem { key, .. } = plan.operation() {
        let item = result
            .items
            .into_iter()
            .next()
            .ok_or_else(|| RepositoryError::NotFound {
                entity_type: "BlogPost",
                id: key.to_string(),
            })?;
        let post: BlogPost = from_item(item)?;
        return Ok(Json(BlogPostView::new(post, viewer, true)).into_response());
    }

    let posts = result
        .items
        .into_iter()
        .map(|item| {
            from_item::<BlogPost>(item).map(|post| BlogPostView::new(post, viewer, query.full_post))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ListResponse::new(posts, result.next_cursor)).into_response())
}

/// Create a blog post (POST /blog/admin/new).
#[axum::debug_handler]
pub async fn create_blog_post(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    payload: Result<Json<CreateBlogPostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BlogPost>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let post = payload.into_blog_post();
    state
        .store
        .put_item(
            &state.tables().blog_posts,
            to_item(&post)?,
            WriteCondition::IfNotExists,
        )
        .await?;

    tracing::info!(
        theme = %post.theme,
        created_at = post.created_at,
        admin = %admin.username,
        "Created blog post"
    );
    Ok((StatusCode::CREATED, Json(post)))
}

/// Delete a blog post (DELETE /blog/admin/delete?productName=&createdAt=).
#[axum::debug_handler]
pub async fn delete_blog_post(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    query: Result<Query<DeleteBlogPostQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Query(query) = query?;

    let key = post_key(&query.product_name, query.created_at);
    state
        .store
        .delete_item(&state.tables().blog_posts, &key)
        .await?;

    tracing::info!(%key, admin = %admin.username, "Deleted blog post");
    Ok(Json(MessageResponse::new("Blog post deleted")))
}

/// Like a post, or remove the caller's like (POST /blog/{theme}/{createdAt}/like).
#[axum::debug_handler]
pub async fn toggle_like(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    path: Result<Path<(String, i64)>, PathRejection>,
) -> Result<Json<LikeResponse>, AppError> {
    let Path((theme, created_at)) = path?;

    let outcome = state
        .relations
        .toggle_like(&theme, created_at, &user.username)
        .await?;

    tracing::info!(
        theme = %theme,
        created_at,
        username = %user.username,
        change = ?outcome.change,
        "Toggled like"
    );
    Ok(Json(LikeResponse {
        message: "Success",
        liked: outcome.change == MembershipChange::Added,
        likes: outcome.post.likes.len(),
    }))
}
