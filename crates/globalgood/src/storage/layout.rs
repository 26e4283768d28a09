//! Key layout of every table the service reads and writes.

use std::collections::HashMap;

use globalgood_core::storage::{Item, Key, Tables};

/// A global secondary index: its own partition and optional sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexLayout {
    pub name: &'static str,
    pub partition_key: &'static str,
    pub sort_key: Option<&'static str>,
}

/// Primary key and indexes of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub partition_key: &'static str,
    pub sort_key: Option<&'static str>,
    pub indexes: &'static [IndexLayout],
    /// Attributes stored as string sets. An empty set is never stored.
    pub string_sets: &'static [&'static str],
}

impl TableLayout {
    pub fn index(&self, name: &str) -> Option<&IndexLayout> {
        self.indexes.iter().find(|index| index.name == name)
    }

    /// Primary key of `item`, or `None` when a key attribute is missing.
    pub fn key_of(&self, item: &Item) -> Option<Key> {
        Key::from_item(item, self.partition_key, self.sort_key)
    }

    /// Attributes identifying an item's position in a traversal of the table
    /// or of `index`: the index key first, then the table key.
    pub fn position_attributes(&self, index: Option<&IndexLayout>) -> Vec<&'static str> {
        let mut attributes = Vec::with_capacity(4);
        if let Some(index) = index {
            attributes.push(index.partition_key);
            attributes.extend(index.sort_key);
        }
        for attribute in [Some(self.partition_key), self.sort_key].into_iter().flatten() {
            if !attributes.contains(&attribute) {
                attributes.push(attribute);
            }
        }
        attributes
    }
}

pub const PRODUCTS: TableLayout = TableLayout {
    partition_key: "collection",
    sort_key: Some("name"),
    indexes: &[IndexLayout {
        name: "name-index",
        partition_key: "name",
        sort_key: None,
    }],
    string_sets: &[],
};

pub const REVIEWS: TableLayout = TableLayout {
    partition_key: "productName",
    sort_key: Some("createdAt"),
    indexes: &[IndexLayout {
        name: "username-createdAt-index",
        partition_key: "username",
        sort_key: Some("createdAt"),
    }],
    string_sets: &[],
};

pub const BLOG_POSTS: TableLayout = TableLayout {
    partition_key: "theme",
    sort_key: Some("createdAt"),
    indexes: &[],
    string_sets: &["likes"],
};

pub const COMMENTS: TableLayout = TableLayout {
    partition_key: "commentId",
    sort_key: Some("createdAt"),
    indexes: &[],
    string_sets: &[],
};

/// Layouts keyed by the configured table names.
pub fn layouts(tables: &Tables) -> HashMap<String, TableLayout> {
    HashMap::from([
        (tables.products.clone(), PRODUCTS),
        (tables.reviews.clone(), REVIEWS),
        (tables.blog_posts.clone(), BLOG_POSTS),
        (tables.comments.clone(), COMMENTS),
    ])
}
