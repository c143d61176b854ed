/// Core error types for Driftmix
use thiserror::Error;

/// Result type alias using `DriftError`
pub type Result<T> = std::result::Result<T, DriftError>;

/// Core error type for Driftmix
#[derive(Error, Debug)]
pub enum DriftError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The platform refused to persist more file-access grants. The tracks that
    /// could not be secured have already been rolled back at the storage level;
    /// the message tells the user how many were affected and what the cap is.
    #[error("{requested} track(s) could not be kept: the platform allows at most {allowance} persisted file permissions")]
    PermissionGrantsExhausted { requested: usize, allowance: usize },

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl DriftError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a not-found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid-input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
