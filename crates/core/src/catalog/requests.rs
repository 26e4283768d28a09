//! Request payloads, validated at the boundary before any store call.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValidationError;
use super::types::{BlogContent, BlogPost, Collection, Comment, Review};

pub const REVIEW_TITLE_MAX: usize = 50;
pub const REVIEW_TEXT_MAX: usize = 500;
pub const COMMENT_MIN: usize = 3;
pub const COMMENT_MAX: usize = 500;

fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

fn at_most(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

/// Request payload for reviewing a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub rating: i64,
    pub review_title: String,
    pub review_text: String,
}

impl CreateReviewRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=5).contains(&self.rating) {
            return Err(ValidationError::OutOfRange {
                field: "rating",
                min: 1,
                max: 5,
            });
        }
        required("reviewTitle", &self.review_title)?;
        at_most("reviewTitle", &self.review_title, REVIEW_TITLE_MAX)?;
        required("reviewText", &self.review_text)?;
        at_most("reviewText", &self.review_text, REVIEW_TEXT_MAX)
    }

    /// Builds the review authored by `username`. Call [`Self::validate`] first.
    pub fn into_review(
        self,
        product_name: impl Into<String>,
        collection: Collection,
        username: impl Into<String>,
    ) -> Review {
        Review {
            product_name: product_name.into(),
            created_at: Utc::now().timestamp_millis(),
            product_collection: collection,
            review_id: Uuid::new_v4(),
            username: username.into(),
            rating: self.rating.clamp(1, 5) as u8,
            review_title: self.review_title,
            review_text: self.review_text,
        }
    }
}

/// Request payload for an administrator creating a blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogPostRequest {
    /// The featured product; becomes the post's theme.
    #[serde(alias = "theme")]
    pub product_name: String,
    pub title: String,
    pub content: BlogContent,
    pub product_collection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

impl CreateBlogPostRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        required("productName", &self.product_name)?;
        required("title", &self.title)?;
        if self.content.is_blank() {
            return Err(ValidationError::Required("content"));
        }
        required("productCollection", &self.product_collection)
    }

    /// Image file name derived from the product name: `"Woven Basket"` -> `"woven-basket.png"`.
    pub fn default_img(product_name: &str) -> String {
        format!("{}.png", product_name.to_lowercase().replace(' ', "-"))
    }

    pub fn into_blog_post(self) -> BlogPost {
        let img = self
            .img
            .filter(|img| !img.trim().is_empty())
            .unwrap_or_else(|| Self::default_img(&self.product_name));
        BlogPost {
            theme: self.product_name,
            created_at: Utc::now().timestamp_millis(),
            title: self.title,
            content: self.content,
            img,
            product_collection: Some(self.product_collection),
            likes: Vec::new(),
            comments: Vec::new(),
        }
    }
}

/// Request payload for commenting on a blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCommentRequest {
    pub text: String,
}

impl AddCommentRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let length = self.text.trim().chars().count();
        if length < COMMENT_MIN {
            return Err(ValidationError::TooShort {
                field: "Comment",
                min: COMMENT_MIN,
            });
        }
        if length > COMMENT_MAX {
            return Err(ValidationError::TooLong {
                field: "Comment",
                max: COMMENT_MAX,
            });
        }
        Ok(())
    }

    /// Builds a new comment on the post `(theme, post_created_at)`.
    pub fn into_comment(
        self,
        theme: impl Into<String>,
        post_created_at: i64,
        username: impl Into<String>,
    ) -> Comment {
        Comment {
            comment_id: Uuid::new_v4().to_string(),
            created_at: Utc::now().timestamp_millis(),
            content: self.text.trim().to_string(),
            username: username.into(),
            blog_theme: theme.into(),
            blog_created_at: post_created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: i64, title: &str, text: &str) -> CreateReviewRequest {
        CreateReviewRequest {
            rating,
            review_title: title.to_string(),
            review_text: text.to_string(),
        }
    }

    #[test]
    fn test_review_rating_bounds() {
        assert!(review(1, "Nice", "Solid").validate().is_ok());
        assert!(review(5, "Nice", "Solid").validate().is_ok());
        assert_eq!(
            review(0, "Nice", "Solid").validate(),
            Err(ValidationError::OutOfRange {
                field: "rating",
                min: 1,
                max: 5
            })
        );
        assert!(review(6, "Nice", "Solid").validate().is_err());
    }

    #[test]
    fn test_review_title_length() {
        assert_eq!(
            review(4, "", "Solid").validate(),
            Err(ValidationError::Required("reviewTitle"))
        );
        assert!(review(4, &"t".repeat(50), "Solid").validate().is_ok());
        assert_eq!(
            review(4, &"t".repeat(51), "Solid").validate(),
            Err(ValidationError::TooLong {
                field: "reviewTitle",
                max: 50
            })
        );
    }

    #[test]
    fn test_review_text_length() {
        assert!(review(4, "Nice", &"x".repeat(500)).validate().is_ok());
        assert!(review(4, "Nice", &"x".repeat(501)).validate().is_err());
    }

    #[test]
    fn test_into_review_sets_identity_fields() {
        let review = review(4, "Nice", "Solid").into_review(
            "Woven Basket",
            Collection::HomeLiving,
            "alice",
        );

        assert_eq!(review.product_name, "Woven Basket");
        assert_eq!(review.username, "alice");
        assert_eq!(review.rating, 4);
        assert!(review.created_at > 0);
    }

    fn blog_request(img: Option<&str>) -> CreateBlogPostRequest {
        CreateBlogPostRequest {
            product_name: "Woven Basket".to_string(),
            title: "From Bolgatanga".to_string(),
            content: BlogContent::Freeform {
                paragraphs: vec!["Story".to_string()],
            },
            product_collection: "home-living".to_string(),
            img: img.map(str::to_string),
        }
    }

    #[test]
    fn test_blog_post_img_defaults_from_name() {
        let post = blog_request(None).into_blog_post();

        assert_eq!(post.img, "woven-basket.png");
        assert_eq!(post.theme, "Woven Basket");
        assert!(post.likes.is_empty());
    }

    #[test]
    fn test_blog_post_keeps_explicit_img() {
        let post = blog_request(Some("basket-hero.jpg")).into_blog_post();
        assert_eq!(post.img, "basket-hero.jpg");
    }

    #[test]
    fn test_blog_post_requires_fields() {
        let mut request = blog_request(None);
        request.title = "  ".to_string();
        assert_eq!(request.validate(), Err(ValidationError::Required("title")));

        let mut request = blog_request(None);
        request.content = BlogContent::Freeform { paragraphs: vec![] };
        assert_eq!(
            request.validate(),
            Err(ValidationError::Required("content"))
        );
    }

    #[test]
    fn test_blog_request_accepts_theme_alias() {
        let request: CreateBlogPostRequest = serde_json::from_str(
            r#"{"theme":"Shea Butter","title":"t","content":"c","productCollection":"beauty-wellness"}"#,
        )
        .unwrap();
        assert_eq!(request.product_name, "Shea Butter");
    }

    #[test]
    fn test_comment_length_bounds() {
        let comment = |text: &str| AddCommentRequest {
            text: text.to_string(),
        };

        assert_eq!(
            comment("hi").validate().unwrap_err().to_string(),
            "Comment must contain at least 3 characters"
        );
        assert!(comment("hey").validate().is_ok());
        assert!(comment(&"a".repeat(500)).validate().is_ok());
        assert_eq!(
            comment(&"a".repeat(501)).validate().unwrap_err().to_string(),
            "Comment must not exceed 500 characters"
        );
    }

    #[test]
    fn test_into_comment_back_references_post() {
        let comment = AddCommentRequest {
            text: " Lovely story ".to_string(),
        }
        .into_comment("coffee", 7, "alice");

        assert_eq!(comment.blog_theme, "coffee");
        assert_eq!(comment.blog_created_at, 7);
        assert_eq!(comment.content, "Lovely story");
        assert!(Uuid::parse_str(&comment.comment_id).is_ok());
    }
}
