//! Error types shared across the client.
//!
//! `ApiError` covers everything that can go wrong talking to the backend,
//! `DraftError` covers local validation of user input, and `AppError` is the
//! top-level union returned by the CLI commands.

use thiserror::Error;

use crate::config::ConfigError;

/// Failure of a single API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, TLS...).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    ///
    /// `message` is the body's `error` field when present, otherwise a
    /// generic message for the operation.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The response body did not match the expected record shape.
    #[error("unexpected response from server: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status of a server-side failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            ApiError::Decode(_) => None,
        }
    }

    /// Whether the backend reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Client-side validation failure. No request is sent when one of these occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Task title is required")]
    BlankTitle,
    #[error("Comment content is required")]
    BlankContent,
}

/// Top-level error for command execution.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result alias used by the command layer.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_displays_message_verbatim() {
        let err = ApiError::Server { status: 400, message: "Task title cannot be empty".into() };
        assert_eq!(err.to_string(), "Task title cannot be empty");
        assert_eq!(err.status(), Some(400));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found() {
        let err = ApiError::Server { status: 404, message: "Resource not found".into() };
        assert!(err.is_not_found());
        assert!(!ApiError::Decode("x".into()).is_not_found());
    }

    #[test]
    fn test_draft_messages() {
        assert_eq!(DraftError::BlankTitle.to_string(), "Task title is required");
        assert_eq!(AppError::from(DraftError::BlankContent).to_string(), "Comment content is required");
    }
}
