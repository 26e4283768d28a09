use serde::Serialize;

use super::types::{BlogContent, BlogPost, CommentRef};

/// Outward shape of a blog post.
///
/// The stored likes list is replaced by its count and a `liked` flag for the
/// requesting user. Content and comment references are only included for
/// full posts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostView {
    pub theme: String,
    pub created_at: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<BlogContent>,
    pub img: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_collection: Option<String>,
    pub likes: usize,
    pub liked: bool,
    pub comment_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CommentRef>>,
}

impl BlogPostView {
    /// Anonymous viewers never see a post as liked.
    pub fn new(post: BlogPost, viewer: Option<&str>, full: bool) -> Self {
        let liked = viewer.is_some_and(|name| post.likes.iter().any(|l| l == name));
        Self {
            theme: post.theme,
            created_at: post.created_at,
            title: post.title,
            content: full.then_some(post.content),
            img: post.img,
            product_collection: post.product_collection,
            likes: post.likes.len(),
            liked,
            comment_count: post.comments.len(),
            comments: full.then_some(post.comments),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post() -> BlogPost {
        BlogPost {
            theme: "coffee".to_string(),
            created_at: 7,
            title: "Beans".to_string(),
            content: BlogContent::Freeform {
                paragraphs: vec!["Roasted".to_string()],
            },
            img: "coffee.png".to_string(),
            product_collection: Some("food-beverages".to_string()),
            likes: vec!["alice".to_string(), "bob".to_string()],
            comments: vec![CommentRef::new("c-1", 8)],
        }
    }

    #[test]
    fn test_view_counts_likes_and_flags_viewer() {
        let view = BlogPostView::new(post(), Some("bob"), false);

        assert_eq!(view.likes, 2);
        assert!(view.liked);
        assert_eq!(view.comment_count, 1);
    }

    #[test]
    fn test_anonymous_viewer_never_liked() {
        assert!(!BlogPostView::new(post(), None, false).liked);
        assert!(!BlogPostView::new(post(), Some("carol"), false).liked);
    }

    #[test]
    fn test_listing_omits_content_and_comments() {
        let value = serde_json::to_value(BlogPostView::new(post(), None, false)).unwrap();

        assert!(value.get("content").is_none());
        assert!(value.get("comments").is_none());
        assert_eq!(value["likes"], json!(2));
        assert_eq!(value["liked"], json!(false));
    }

    #[test]
    fn test_full_post_includes_content() {
        let value = serde_json::to_value(BlogPostView::new(post(), None, true)).unwrap();

        assert_eq!(value["content"]["custom"], json!(true));
        assert_eq!(value["comments"], json!(["c-1#8"]));
    }
}
