//! In-memory storage backend for development and testing.
//!
//! Tables are held in a `HashMap` wrapped in `Arc<RwLock<_>>` and follow the
//! DynamoDB semantics the services rely on: `limit` counts evaluated items
//! before the filter, results are ordered by sort key, continuation keys
//! resume after the last evaluated item, and secondary indexes are looked up
//! by attribute name. Data is lost when the store is dropped.
//!
//! # Example
//!
//! ```rust,ignore
//! use globalgood_core::storage::Tables;
//!
//! let store = InMemoryStore::new(&Tables::default());
//! ```

mod store;

pub use store::InMemoryStore;
