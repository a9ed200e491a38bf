//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server rejected the request
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading a local file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload failed client-side validation
    #[error(transparent)]
    Model(#[from] shared::ValidationError),

    /// Logged in, but the account is not an admin
    #[error("Access denied. Not an admin user.")]
    NotAdmin,

    /// Batch upload failed at the transport or server level; nothing was saved
    #[error("Image upload failed: {0}")]
    UploadTransport(String),

    /// Upload succeeded but returned no usable identifiers; nothing was saved
    #[error("Upload did not return file ids for {pending} pending image(s)")]
    UploadReconciliation { pending: usize },

    /// Fewer identifiers than pending images (strict policy only)
    #[error("Upload returned {resolved} file id(s) for {pending} pending image(s)")]
    PartialReconciliation { pending: usize, resolved: usize },

    /// A submit is already in flight for this session
    #[error("A save is already in progress")]
    SessionBusy,
}

impl ClientError {
    /// Whether the admin can simply try the same action again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Http(_) | ClientError::Internal(_) | ClientError::UploadTransport(_)
        )
    }

    /// Whether the error came from the image upload step of a submit
    pub fn is_upload_failure(&self) -> bool {
        matches!(
            self,
            ClientError::UploadTransport(_)
                | ClientError::UploadReconciliation { .. }
                | ClientError::PartialReconciliation { .. }
        )
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
