mod queries;

use serde::Serialize;

pub use queries::{
    BlogQuery, CommentsQuery, DeleteBlogPostQuery, PageQuery, ProductsQuery,
    ReviewsByAuthorQuery, SearchQuery,
};

/// Envelope for paginated list responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T, C = String> {
    pub items: Vec<T>,
    /// Pass back as `cursor` to fetch the next page; `null` on the last one.
    pub next_cursor: Option<C>,
}

impl<T, C> ListResponse<T, C> {
    pub fn new(items: Vec<T>, next_cursor: Option<C>) -> Self {
        Self { items, next_cursor }
    }
}

/// Body of responses that only carry a message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of a like toggle.
#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub message: &'static str,
    /// Whether the caller now likes the post.
    pub liked: bool,
    pub likes: usize,
}
