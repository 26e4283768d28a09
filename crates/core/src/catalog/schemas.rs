//! Key layouts and filters of the queryable entities.

use crate::query::{EntitySchema, FilterField, FilterKind};
use crate::storage::Order;

pub const PRODUCTS: EntitySchema = EntitySchema {
    name: "products",
    partition_key: "collection",
    sort_key: Some("name"),
    index: None,
    order: Order::Ascending,
    filters: &[
        FilterField::new("maxPrice", "price", FilterKind::AtMost),
        FilterField::new("availability", "availability", FilterKind::InStock),
        FilterField::new("countries", "countryOfOrigin", FilterKind::OneOf),
        FilterField::new("q", "name", FilterKind::Search),
    ],
};

/// Products looked up by name alone.
pub const PRODUCTS_BY_NAME: EntitySchema = EntitySchema {
    name: "products-by-name",
    partition_key: "name",
    sort_key: None,
    index: Some("name-index"),
    order: Order::Ascending,
    filters: &[],
};

pub const REVIEWS: EntitySchema = EntitySchema {
    name: "reviews",
    partition_key: "productName",
    sort_key: Some("createdAt"),
    index: None,
    order: Order::Ascending,
    filters: &[],
};

/// Reviews by author, newest first.
pub const REVIEWS_BY_AUTHOR: EntitySchema = EntitySchema {
    name: "reviews-by-author",
    partition_key: "username",
    sort_key: Some("createdAt"),
    index: Some("username-createdAt-index"),
    order: Order::Descending,
    filters: &[],
};

pub const BLOG_POSTS: EntitySchema = EntitySchema {
    name: "blog-posts",
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
