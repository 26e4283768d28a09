mod error;
mod execute;
#[cfg(test)]
pub(crate) mod testing;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use execute::{execute, QueryResult};
pub use traits::DocumentStore;
pub use types::{
    Item, Key, KeyPart, Order, Page, QueryRequest, ScanRequest, SetUpdate, Tables,
    WriteCondition,
};
