//! Permission request: one access-grant lifecycle instance.
//!
//! A request is created `Pending` and moved along the lifecycle by
//! [`PermissionRequest::apply`]. Timestamps are passed in by the caller so the
//! transitions stay deterministic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Action, DataSource, PermissionStatus, RequestId};

/// A request for access to one upstream data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PermissionRequest {
    /// Unique identifier, fixed at creation.
    pub request_id: RequestId,

    /// Who is asking for access.
    pub requester: String,

    /// The source access is requested for.
    pub data_source: DataSource,

    /// Intended use, fixed at creation.
    pub purpose: String,

    /// Current lifecycle status.
    pub status: PermissionStatus,

    /// When the request was created.
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,

    /// When the request last changed status.
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,

    /// Last actor to grant, deny, or revoke the request.
    #[serde(default)]
    pub granted_by: Option<String>,

    /// Free-form notes, replaced by later actions that supply new ones.
    #[serde(default)]
    pub notes: Option<String>,
}

impl PermissionRequest {
    /// Create a new pending request.
    pub fn new(
        request_id: RequestId,
        requester: impl Into<String>,
        data_source: DataSource,
        purpose: impl Into<String>,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            request_id,
            requester: requester.into(),
            data_source,
            purpose: purpose.into(),
            status: PermissionStatus::Pending,
            created_at: now,
            updated_at: now,
            granted_by: None,
            notes,
        }
    }

    /// Apply a lifecycle action performed by `actor`.
    ///
    /// On failure the request is left untouched. `updated_at` never moves
    /// before `created_at`, even if `now` does.
    pub fn apply(
        &mut self,
        action: Action,
        actor: impl Into<String>,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        let next = self
            .status
            .apply(action)
            .ok_or_else(|| CoreError::InvalidTransition {
                request_id: self.request_id.clone(),
                action,
                current: self.status,
            })?;

        self.status = next;
        self.granted_by = Some(actor.into());
        self.updated_at = now.max(self.created_at);
        if let Some(notes) = notes.filter(|n| !n.is_empty()) {
            self.notes = Some(notes);
        }

        Ok(())
    }

    /// Whether this request currently grants access.
    pub fn is_granted(&self) -> bool {
        self.status == PermissionStatus::Granted
    }

    /// Whether this request is for `requester` on `data_source`.
    pub fn is_for(&self, requester: &str, data_source: DataSource) -> bool {
        self.requester == requester && self.data_source == data_source
    }
}

/// Serde adapter for request timestamps.
///
/// Writes RFC 3339 in UTC with a `+00:00` offset, with microseconds only when
/// the value has a fractional part. Reads RFC 3339 with any offset, and also
/// bare `YYYY-MM-DDTHH:MM:SS[.fff]` values without an offset, taken as UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Serialize a timestamp as RFC 3339.
    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(value))
    }

    /// Render a timestamp the way it is stored.
    ///
    /// Sub-microsecond digits are dropped.
    pub fn format(value: &DateTime<Utc>) -> String {
        let precision = if value.timestamp_subsec_micros() == 0 {
            SecondsFormat::Secs
        } else {
            SecondsFormat::Micros
        };
        value.to_rfc3339_opts(precision, false)
    }

    /// Deserialize a timestamp, accepting offset-less values as UTC.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    /// Parse a stored timestamp string.
    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        match DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => Ok(parsed.with_timezone(&Utc)),
            Err(rfc_err) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| Utc.from_utc_datetime(&naive))
                .map_err(|_| rfc_err),
        }
    }
}
