//! Error types for document type operations.

use thiserror::Error;

/// Document type error.
#[derive(Error, Debug)]
pub enum DocTypeError {
    /// An operation needs configuration that was not provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Caller-supplied data is missing a required field.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A caller-supplied identifier is structurally invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Document not found.
    #[error("Document not found: {index}/{type_name}/{id}")]
    NotFound {
        /// Index name.
        index: String,
        /// Type name.
        type_name: String,
        /// Document ID.
        id: String,
    },

    /// The transport could not complete the exchange.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("Request failed with status {status}: {reason}")]
    Response {
        /// HTTP status code.
        status: u16,
        /// Error reason reported by the server.
        reason: String,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Client error from opensearch crate.
    #[error("Client error: {0}")]
    Client(#[from] opensearch::Error),
}

impl DocTypeError {
    /// Check if this error means the document does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error came from the transport rather than from
    /// validating the call.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Response { .. } | Self::Client(_)
        )
    }

    /// Get the HTTP status code if the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for document type operations.
pub type Result<T> = std::result::Result<T, DocTypeError>;
