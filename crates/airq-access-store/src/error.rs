//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error reading, writing, or removing the store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Request set could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The store exists but its contents cannot be decoded or validated.
    #[error("corrupt store at {location}: {reason}")]
    Corrupt { location: String, reason: String },
}

impl StoreError {
    /// Whether this error means the stored document is unreadable.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::Corrupt { .. })
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
