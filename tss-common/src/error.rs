//! Error types for the shared helpers.

use thiserror::Error;

/// Errors raised while interpreting shared configuration values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// A log level name that is not one of trace, debug, info, warn or error
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}

impl CommonError {
    /// Create an invalid log level error.
    #[must_use]
    pub fn invalid_log_level(level: impl Into<String>) -> Self {
        Self::InvalidLogLevel(level.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CommonError::invalid_log_level("loud");
        assert_eq!(err.to_string(), "Invalid log level: loud");
    }
}
