//! Structural checks for requests read back from storage.

use crate::error::ValidationError;
use crate::request::PermissionRequest;

/// Validate a single request's own invariants.
///
/// This performs:
/// - Non-empty id check
/// - Timestamp ordering (`created_at <= updated_at`)
pub fn validate_request(request: &PermissionRequest) -> Result<(), ValidationError> {
    if request.request_id.as_str().is_empty() {
        return Err(ValidationError::EmptyId);
    }

    if request.updated_at < request.created_at {
        return Err(ValidationError::TimestampOrder {
            request_id: request.request_id.clone(),
            created_at: request.created_at.to_rfc3339(),
            updated_at: request.updated_at.to_rfc3339(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataSource, RequestId};
    use chrono::{Duration, TimeZone, Utc};

    fn request(id: &str) -> PermissionRequest {
        PermissionRequest::new(
            RequestId::from(id),
            "u",
            DataSource::Custom,
            "p",
            None,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_valid_request() {
        assert!(validate_request(&request("PR-1")).is_ok());
    }

    #[test]
    fn test_empty_id() {
        let err = validate_request(&request("")).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyId));
    }

    #[test]
    fn test_updated_before_created() {
        let mut r = request("PR-1");
        r.updated_at = r.created_at - Duration::seconds(1);
        let err = validate_request(&r).unwrap_err();
        assert!(matches!(err, ValidationError::TimestampOrder { .. }));
    }
}
