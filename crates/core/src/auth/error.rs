use thiserror::Error;

/// Reasons a bearer token does not yield an identity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("expected an access token, got {0}")]
    WrongTokenUse(String),

    #[error("token was issued for another client")]
    ClientMismatch,

    #[error("missing required claim: {0}")]
    MissingClaim(&'static str),

    #[error("user is not a member of {0}")]
    MissingGroup(String),

    #[error("signing keys unavailable: {0}")]
    KeySet(String),
}

impl AuthError {
    /// True when the caller is authenticated but lacks a required group.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, AuthError::MissingGroup(_))
    }
}
