use thiserror::Error;

/// Errors raised while planning a store operation, before any I/O.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("{0}")]
    InvalidFilterCombination(String),
    #[error("Cursor does not belong to this query")]
    StaleCursor,
    #[error("Malformed cursor")]
    MalformedCursor,
    #[error("Invalid value for {field}: {reason}")]
    InvalidFilterValue { field: String, reason: String },
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),
}

impl PlanError {
    pub fn invalid_value(field: &str, reason: impl Into<String>) -> Self {
        PlanError::InvalidFilterValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_combination_display_is_message() {
        let error = PlanError::InvalidFilterCombination(
            "If createdAt is provided, theme must also be provided".to_string(),
        );
        assert_eq!(
            error.to_string(),
            "If createdAt is provided, theme must also be provided"
        );
    }

    #[test]
    fn test_invalid_value_display() {
        let error = PlanError::invalid_value("maxPrice", "expected a number");
        assert_eq!(
            error.to_string(),
            "Invalid value for maxPrice: expected a number"
        );
    }
}
