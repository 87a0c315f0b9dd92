// Client error types
use thiserror::Error;

use crate::types::Operation;

/// Failure of a single request against the carshop API
#[derive(Debug, Error)]
pub enum ClientError {
    // Connection refused, DNS, broken body stream...
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    // Body was not JSON, or not the shape we expect
    #[error("Unexpected response body: {0}")]
    Decode(String),

    // Server answered with a non-success status
    #[error("{operation} rejected with HTTP {status}")]
    Rejected { operation: Operation, status: u16 },

    // Login answered without an Authorization header
    #[error("No token in login response (HTTP {status})")]
    MissingToken { status: u16 },

    #[error("Invalid locator '{locator}': {reason}")]
    InvalidLocator { locator: String, reason: String },
}

/// How a failure surfaces to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Dismissible notification, login form stays usable
    AuthFailure,
    /// Blocking alert, collection left unchanged
    MutationFailure,
    /// Logged only
    Transport,
}

impl ClientError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ClientError::MissingToken { .. } => ErrorClass::AuthFailure,
            ClientError::Rejected { operation, .. } if operation.is_mutation() => {
                ErrorClass::MutationFailure
            }
            ClientError::Rejected { .. }
            | ClientError::Transport(_)
            | ClientError::Decode(_)
            | ClientError::InvalidLocator { .. } => ErrorClass::Transport,
        }
    }

    /// HTTP status, when the server answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Rejected { status, .. } | ClientError::MissingToken { status } => {
                Some(*status)
            }
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            ClientError::Decode(_) | ClientError::InvalidLocator { .. } => None,
        }
    }

    /// Error code for JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Transport(_) => "TRANSPORT_ERROR",
            ClientError::Decode(_) => "DECODE_ERROR",
            ClientError::Rejected { .. } => "REJECTED",
            ClientError::MissingToken { .. } => "MISSING_TOKEN",
            ClientError::InvalidLocator { .. } => "INVALID_LOCATOR",
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        ClientError::Decode(message.into())
    }

    pub fn invalid_locator(locator: impl Into<String>, reason: impl ToString) -> Self {
        ClientError::InvalidLocator {
            locator: locator.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
