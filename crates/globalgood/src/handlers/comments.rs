//! Blog post comment handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use globalgood_auth::CurrentUser;
use globalgood_core::catalog::{AddCommentRequest, Comment, CommentView};

use crate::{
    handlers::AppError,
    models::{CommentsQuery, ListResponse},
    state::AppState,
};

/// Comment on a post (POST /blog/{theme}/{createdAt}/comment).
#[axum::debug_handler]
pub async fn add_comment(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    path: Result<Path<(String, i64)>, PathRejection>,
    payload: Result<Json<AddCommentRequest>, JsonRejection>,
) -> Result<Json<Comment>, AppError> {
    let Path((theme, created_at)) = path?;
    let Json(payload) = payload?;
    payload.validate()?;

    let comment = payload.into_comment(theme, created_at, user.username);
    let comment = state.relations.add_comment(comment).await?;

    tracing::info!(
        comment_id = %comment.comment_id,
        theme = %comment.blog_theme,
        username = %comment.username,
        "Added comment"
    );
    Ok(Json(comment))
}

/// List a window of a post's comments, newest first
/// (GET /blog/{theme}/{createdAt}/comments).
#[axum::debug_handler]
pub async fn list_comments(
    State(state): State<AppState>,
    path: Result<Path<(String, i64)>, PathRejection>,
    query: Result<Query<CommentsQuery>, QueryRejection>,
) -> Result<Json<ListResponse<CommentView, usize>>, AppError> {
    let Path((theme, created_at)) = path?;
    let Query(query) = query?;

    let page = state
        .relations
        .list_comments(&theme, created_at, query.limit, query.cursor)
        .await?;

    Ok(Json(ListResponse::new(page.comments, page.next_cursor)))
}
