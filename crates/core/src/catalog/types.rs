//! Stored entities of the catalogue and blog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{ReferenceError, ValidationError};
use crate::storage::{Item, Key};

/// Product collections. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    ClothingAccessories,
    HomeLiving,
    BeautyWellness,
    FoodBeverages,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::ClothingAccessories,
        Collection::HomeLiving,
        Collection::BeautyWellness,
        Collection::FoodBeverages,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::ClothingAccessories => "clothing-accessories",
            Collection::HomeLiving => "home-living",
            Collection::BeautyWellness => "beauty-wellness",
            Collection::FoodBeverages => "food-beverages",
        }
    }
}

impl FromStr for Collection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownCollection(s.to_string()))
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalogue product, keyed by (collection, name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub collection: Collection,
    pub name: String,
    pub description: String,
    pub img: String,
    pub price: f64,
    pub country_of_origin: String,
    #[serde(default)]
    pub materials: Vec<String>,
    /// Units in stock; 0 means unavailable.
    pub availability: u32,
}

/// A product review, keyed by (productName, createdAt). Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub product_name: String,
    /// Epoch milliseconds.
    pub created_at: i64,
    pub product_collection: Collection,
    pub review_id: Uuid,
    pub username: String,
    pub rating: u8,
    pub review_title: String,
    pub review_text: String,
}

/// Body of a blog post.
///
/// Stored as an object whose `custom` flag selects the variant. A bare string
/// is read as freeform text split into paragraphs on blank lines.
#[derive(Debug, Clone, PartialEq)]
pub enum BlogContent {
    Structured {
        introduction: String,
        story: String,
        fair_trade_impact: String,
    },
    Freeform {
        paragraphs: Vec<String>,
    },
}

impl BlogContent {
    pub fn is_blank(&self) -> bool {
        match self {
            BlogContent::Structured {
                introduction,
                story,
                fair_trade_impact,
            } => [introduction, story, fair_trade_impact]
                .iter()
                .all(|s| s.trim().is_empty()),
            BlogContent::Freeform { paragraphs } => paragraphs.iter().all(|p| p.trim().is_empty()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ContentRepr {
    Text(String),
    Tagged(TaggedContent),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaggedContent {
    custom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    introduction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    story: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fair_trade_impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    paragraphs: Option<Vec<String>>,
}

impl TryFrom<ContentRepr> for BlogContent {
    type Error = String;

    fn try_from(repr: ContentRepr) -> Result<Self, Self::Error> {
        match repr {
            ContentRepr::Text(text) => Ok(BlogContent::Freeform {
                paragraphs: text
                    .split("\n\n")
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect(),
            }),
            ContentRepr::Tagged(TaggedContent {
                custom: true,
                paragraphs,
                ..
            }) => Ok(BlogContent::Freeform {
                paragraphs: paragraphs.unwrap_or_default(),
            }),
            ContentRepr::Tagged(TaggedContent {
                custom: false,
                introduction: Some(introduction),
                story: Some(story),
                fair_trade_impact: Some(fair_trade_impact),
                ..
            }) => Ok(BlogContent::Structured {
                introduction,
                story,
                fair_trade_impact,
            }),
            ContentRepr::Tagged(_) => Err(
                "structured content requires introduction, story and fairTradeImpact".to_string(),
            ),
        }
    }
}

impl From<BlogContent> for TaggedContent {
    fn from(content: BlogContent) -> Self {
        match content {
            BlogContent::Structured {
                introduction,
                story,
                fair_trade_impact,
            } => TaggedContent {
                custom: false,
                introduction: Some(introduction),
                story: Some(story),
                fair_trade_impact: Some(fair_trade_impact),
                paragraphs: None,
            },
            BlogContent::Freeform { paragraphs } => TaggedContent {
                custom: true,
                introduction: None,
                story: None,
                fair_trade_impact: None,
                paragraphs: Some(paragraphs),
            },
        }
    }
}

impl Serialize for BlogContent {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TaggedContent::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BlogContent {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = ContentRepr::deserialize(deserializer)?;
        BlogContent::try_from(repr).map_err(serde::de::Error::custom)
    }
}

/// A blog post, keyed by (theme, createdAt).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub theme: String,
    pub created_at: i64,
    pub title: String,
    pub content: BlogContent,
    pub img: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_collection: Option<String>,
    /// Usernames that liked the post, each at most once.
    #[serde(default)]
    pub likes: Vec<String>,
    /// Append log of comment references, oldest first.
    #[serde(default)]
    pub comments: Vec<CommentRef>,
}

impl BlogPost {
    pub fn key(&self) -> Key {
        post_key(&self.theme, self.created_at)
    }
}

/// Primary key of the blog post `(theme, created_at)`.
pub fn post_key(theme: &str, created_at: i64) -> Key {
    Key::new("theme", theme).with_sort("createdAt", created_at)
}

/// Reference token `"{commentId}#{createdAt}"` stored in a post's comment list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentRef(String);

impl CommentRef {
    pub fn new(comment_id: &str, created_at: i64) -> Self {
        Self(format!("{comment_id}#{created_at}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the token on its last `#`.
    pub fn parse(&self) -> Result<CommentKey, ReferenceError> {
        let malformed = || ReferenceError::Malformed(self.0.clone());
        let (comment_id, created_at) = self.0.rsplit_once('#').ok_or_else(malformed)?;
        if comment_id.is_empty() {
            return Err(malformed());
        }
        let created_at = created_at.parse::<i64>().map_err(|_| malformed())?;
        Ok(CommentKey {
            comment_id: comment_id.to_string(),
            created_at,
        })
    }
}

impl From<String> for CommentRef {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Primary key of a comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommentKey {
    pub comment_id: String,
    pub created_at: i64,
}

impl CommentKey {
    pub fn to_key(&self) -> Key {
        Key::new("commentId", self.comment_id.as_str()).with_sort("createdAt", self.created_at)
    }

    pub fn from_item(item: &Item) -> Option<Self> {
        Some(Self {
            comment_id: item.get("commentId")?.as_str()?.to_string(),
            created_at: item.get("createdAt")?.as_i64()?,
        })
    }
}

/// A comment on a blog post, with a back-reference to the post's key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub comment_id: String,
    pub created_at: i64,
    pub content: String,
    pub username: String,
    pub blog_theme: String,
    pub blog_created_at: i64,
}

impl Comment {
    pub fn key(&self) -> CommentKey {
        CommentKey {
            comment_id: self.comment_id.clone(),
            created_at: self.created_at,
        }
    }

    pub fn reference(&self) -> CommentRef {
        CommentRef::new(&self.comment_id, self.created_at)
    }
}

/// The projected fields returned when listing comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub comment_id: String,
    pub created_at: i64,
    pub content: String,
    pub username: String,
}

/// Converts a stored item into a typed entity.
pub fn from_item<T: serde::de::DeserializeOwned>(item: Item) -> serde_json::Result<T> {
    serde_json::from_value(serde_json::Value::Object(item))
}

/// Converts an entity into a storable item.
pub fn to_item<T: Serialize>(entity: &T) -> serde_json::Result<Item> {
    match serde_json::to_value(entity)? {
        serde_json::Value::Object(item) => Ok(item),
        _ => Err(serde::ser::Error::custom("entity is not an object")),
    }
}
