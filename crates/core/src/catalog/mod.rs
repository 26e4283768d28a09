mod error;
mod requests;
pub mod schemas;
mod types;
mod views;

pub use error::{ReferenceError, ValidationError};
pub use requests::{
    AddCommentRequest, CreateBlogPostRequest, CreateReviewRequest, COMMENT_MAX, COMMENT_MIN,
    REVIEW_TEXT_MAX, REVIEW_TITLE_MAX,
};
pub use types::{
    from_item, post_key, to_item, BlogContent, BlogPost, Collection, Comment, CommentKey,
    CommentRef, CommentView, Product, Review,
};
pub use views::BlogPostView;
