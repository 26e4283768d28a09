mod error;
mod functions;
mod traits;
mod types;

pub use error::AuthError;
pub use functions::{claims_to_identity, extract_bearer, require_group};
pub use traits::{Result, TokenVerifier};
pub use types::{AccessClaims, Identity};
