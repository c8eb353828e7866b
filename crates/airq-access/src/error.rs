//! Error types for the registry.

use airq_access_core::{Action, CoreError, PermissionStatus, RequestId, ValidationError};
use airq_access_store::StoreError;
use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No request with this id.
    #[error("permission request {0} not found")]
    NotFound(RequestId),

    /// The action is not legal from the request's current status.
    #[error("cannot {action} request {request_id} - status is {current}")]
    InvalidTransition {
        request_id: RequestId,
        action: Action,
        current: PermissionStatus,
    },

    /// A request failed structural validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl RegistryError {
    /// The request's status when an invalid transition was attempted.
    pub fn current_status(&self) -> Option<PermissionStatus> {
        match self {
            RegistryError::InvalidTransition { current, .. } => Some(*current),
            _ => None,
        }
    }
}

impl From<CoreError> for RegistryError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidTransition {
                request_id,
                action,
                current,
            } => RegistryError::InvalidTransition {
                request_id,
                action,
                current,
            },
        }
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
