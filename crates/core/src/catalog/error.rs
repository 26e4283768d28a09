use thiserror::Error;

/// First validation failure found in a request payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field} must contain at least {min} characters")]
    TooShort { field: &'static str, min: usize },
    #[error("{field} must not exceed {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),
}

/// Errors decoding an embedded reference token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("Malformed reference token: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_length_messages() {
        assert_eq!(
            ValidationError::TooShort {
                field: "Comment",
                min: 3
            }
            .to_string(),
            "Comment must contain at least 3 characters"
        );
        assert_eq!(
            ValidationError::TooLong {
                field: "Comment",
                max: 500
            }
            .to_string(),
            "Comment must not exceed 500 characters"
        );
    }

    #[test]
    fn test_required_and_range_messages() {
        assert_eq!(
            ValidationError::Required("title").to_string(),
            "title is required"
        );
        assert_eq!(
            ValidationError::OutOfRange {
                field: "rating",
                min: 1,
                max: 5
            }
            .to_string(),
            "rating must be between 1 and 5"
        );
    }
}
