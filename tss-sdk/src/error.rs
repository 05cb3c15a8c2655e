//! SDK error types using thiserror 2.0.
//!
//! Every failure aborts the current call only; nothing is retried.

use reqwest::StatusCode;
use thiserror::Error;

/// Secret Server client errors.
#[derive(Error, Debug)]
pub enum TssError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Resource name outside the supported set
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Token endpoint failure or malformed grant
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Multipart construction or file transfer failure
    #[error("File upload failed: {0}")]
    FileUpload(String),

    /// Non-2xx response from the server
    #[error("Request failed with status {status}: {message}")]
    Status {
        /// Response status
        status: StatusCode,
        /// Server message, or the raw body when it carries none
        message: String,
    },

    /// Field missing from a secret or template
    #[error("Field not found: {0}")]
    FieldNotFound(String),
}

/// Result type for SDK operations.
pub type TssResult<T> = Result<T, TssError>;

impl TssError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an authentication failed error.
    #[must_use]
    pub fn auth_failed(msg: impl Into<String>) -> Self {
        Self::AuthenticationFailed(msg.into())
    }

    /// Create a file upload error.
    #[must_use]
    pub fn file_upload(msg: impl Into<String>) -> Self {
        Self::FileUpload(msg.into())
    }

    /// Create a field not found error.
    #[must_use]
    pub fn field_not_found(field: impl Into<String>) -> Self {
        Self::FieldNotFound(field.into())
    }

    /// HTTP status carried by the error, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Check if the server reported the target as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TssError::invalid_config("either server_url or tenant must be set");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: either server_url or tenant must be set"
        );

        let err = TssError::Status {
            status: StatusCode::FORBIDDEN,
            message: "Access Denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Request failed with status 403 Forbidden: Access Denied"
        );
    }

    #[test]
    fn test_status_accessor() {
        let err = TssError::Status {
            status: StatusCode::NOT_FOUND,
            message: String::new(),
        };
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(err.is_not_found());

        assert_eq!(TssError::auth_failed("bad grant").status(), None);
        assert!(!TssError::UnknownResource("users".to_string()).is_not_found());
    }

    #[test]
    fn test_from_serde_error() {
        let serde_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: TssError = serde_err.into();
        assert!(matches!(err, TssError::Serialization(_)));
    }
}
