//! DynamoDB storage backend implementation.
//!
//! This module provides a DynamoDB-based implementation of the
//! `DocumentStore` trait using `aws-sdk-dynamodb`. Predicates are rendered
//! into expressions with `#name` and `:value` placeholders, and the likes of
//! a post are kept in a string set so that adding and removing a member are
//! single atomic updates.

mod conversions;
mod error;
mod expressions;
mod store;

pub use store::DynamoDbStore;
