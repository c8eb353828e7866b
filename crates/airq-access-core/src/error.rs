//! Error types for the access core.

use thiserror::Error;

use crate::types::{Action, PermissionStatus, RequestId};

/// Errors raised by request lifecycle operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("cannot {action} request {request_id} - status is {current}")]
    InvalidTransition {
        request_id: RequestId,
        action: Action,
        current: PermissionStatus,
    },
}

/// Structural problems that make a request unusable.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("duplicate request id: {0}")]
    DuplicateId(RequestId),

    #[error("empty request id")]
    EmptyId,

    #[error("request {request_id}: updated_at {updated_at} precedes created_at {created_at}")]
    TimestampOrder {
        request_id: RequestId,
        created_at: String,
        updated_at: String,
    },
}
