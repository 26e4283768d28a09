pub mod blog;
pub mod comments;
pub mod error;
pub mod health;
pub mod products;
pub mod reviews;

pub use error::AppError;
