//! Client error types

use storage::StorageError;
use thiserror::Error;

/// REST client errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Transport failure (connection refused, timeout, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message from the error envelope, or the raw body
        message: String,
    },

    /// Server answered 2xx but reported `success: false`
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Client could not be constructed or request could not be built
    #[error("Client configuration error: {0}")]
    Config(String),
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// HTTP status, when a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this is a network-related error that should be retried
    ///
    /// Network failure statuses: 408, 425, 429, 500, 502, 503, 504, 522, 524
    pub fn is_network_error(&self) -> bool {
        match self {
            ClientError::Network(_) => true,
            ClientError::Api { status, .. } => {
                matches!(status, 408 | 425 | 429 | 500 | 502 | 503 | 504 | 522 | 524)
            }
            _ => false,
        }
    }
}

impl From<ClientError> for StorageError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api { status: 401 | 403, message } => StorageError::PermissionDenied(message),
            other => StorageError::Remote { status: other.status(), message: other.to_string() },
        }
    }
}
