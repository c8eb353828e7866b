//! Stored-document vectors.
//!
//! Known store contents with their expected load outcome. They pin down the
//! on-disk format: what must decode, and what must be treated as corrupt.

use airq_access_core::{DataSource, PermissionStatus};

/// A stored document and what loading it must produce.
#[derive(Debug, Clone)]
pub struct StoreVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Raw file contents.
    pub contents: &'static str,
    /// Expected `(request_id, data_source, status)` in order, or `None` if
    /// the document is corrupt and must load as empty.
    pub expected: Option<&'static [(&'static str, DataSource, PermissionStatus)]>,
}

impl StoreVector {
    /// Whether this document must be rejected as corrupt.
    pub fn is_corrupt(&self) -> bool {
        self.expected.is_none()
    }
}

/// Documents that must load.
pub fn valid_vectors() -> Vec<StoreVector> {
    vec![
        StoreVector {
            name: "empty object",
            contents: "{}",
            expected: Some(&[]),
        },
        StoreVector {
            name: "offset-less timestamps",
            contents: r#"{
  "PR-001": {
    "request_id": "PR-001",
    "requester": "Test User",
    "data_source": "world_bank_api",
    "purpose": "Test purpose",
    "status": "granted",
    "created_at": "2024-01-01T00:00:00",
    "updated_at": "2024-01-02T00:00:00",
    "granted_by": "Admin",
    "notes": null
  }
}"#,
            expected: Some(&[("PR-001", DataSource::WorldBankApi, PermissionStatus::Granted)]),
        },
        StoreVector {
            name: "utc offsets and out-of-order keys",
            contents: r#"{
  "PR-20240301100000-0002": {
    "request_id": "PR-20240301100000-0002",
    "requester": "User2",
    "data_source": "openaq_kaggle",
    "purpose": "Purpose 2",
    "status": "revoked",
    "created_at": "2024-03-01T10:00:00.123456+00:00",
    "updated_at": "2024-03-02T09:00:00+00:00",
    "granted_by": "SecurityTeam",
    "notes": "Access no longer needed"
  },
  "PR-20240301090000-0001": {
    "request_id": "PR-20240301090000-0001",
    "requester": "User1",
    "data_source": "custom",
    "purpose": "Purpose 1",
    "status": "denied",
    "created_at": "2024-03-01T09:00:00Z",
    "updated_at": "2024-03-01T09:30:00Z",
    "granted_by": "Admin",
    "notes": "Not approved"
  }
}"#,
            expected: Some(&[
                ("PR-20240301100000-0002", DataSource::OpenAq, PermissionStatus::Revoked),
                ("PR-20240301090000-0001", DataSource::Custom, PermissionStatus::Denied),
            ]),
        },
        StoreVector {
            name: "optional fields omitted",
            contents: r#"{"PR-9": {"request_id": "PR-9", "requester": "u", "data_source": "custom",
                "purpose": "p", "status": "pending",
                "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"}}"#,
            expected: Some(&[("PR-9", DataSource::Custom, PermissionStatus::Pending)]),
        },
        StoreVector {
            name: "key does not match request_id",
            contents: r#"{
  "PR-20240101120000-0001": {
    "request_id": "PR-20240101120000-0001",
    "requester": "alice",
    "data_source": "world_bank_api",
    "purpose": "research",
    "status": "granted",
    "created_at": "2024-01-01T12:00:00+00:00",
    "updated_at": "2024-01-01T12:05:00+00:00",
    "granted_by": "admin",
    "notes": null
  },
  "legacy-key": {
    "request_id": "PR-20240101120000-0002",
    "requester": "bob",
    "data_source": "openaq_kaggle",
    "purpose": "research",
    "status": "pending",
    "created_at": "2024-01-01T12:00:00+00:00",
    "updated_at": "2024-01-01T12:00:00+00:00",
    "granted_by": null,
    "notes": null
  }
}"#,
            expected: Some(&[
                ("PR-20240101120000-0001", DataSource::WorldBankApi, PermissionStatus::Granted),
                ("PR-20240101120000-0002", DataSource::OpenAq, PermissionStatus::Pending),
            ]),
        },
        StoreVector {
            name: "duplicate key",
            contents: r#"{
                "PR-1": {"request_id": "PR-1", "requester": "u", "data_source": "custom",
                    "purpose": "p", "status": "pending",
                    "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"},
                "PR-2": {"request_id": "PR-2", "requester": "v", "data_source": "custom",
                    "purpose": "p", "status": "pending",
                    "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"},
                "PR-1": {"request_id": "PR-1", "requester": "u", "data_source": "custom",
                    "purpose": "p", "status": "denied", "granted_by": "Admin",
                    "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-02T00:00:00Z"}
            }"#,
            expected: Some(&[
                ("PR-1", DataSource::Custom, PermissionStatus::Denied),
                ("PR-2", DataSource::Custom, PermissionStatus::Pending),
            ]),
        },
    ]
}

/// Documents that must be treated as corrupt.
pub fn corrupt_vectors() -> Vec<StoreVector> {
    vec![
        StoreVector {
            name: "empty file",
            contents: "",
            expected: None,
        },
        StoreVector {
            name: "truncated json",
            contents: r#"{"PR-1": {"request_id": "PR-1""#,
            expected: None,
        },
        StoreVector {
            name: "top-level array",
            contents: "[]",
            expected: None,
        },
        StoreVector {
            name: "unknown data source",
            contents: r#"{"PR-1": {"request_id": "PR-1", "requester": "u", "data_source": "openaq",
                "purpose": "p", "status": "pending",
                "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"}}"#,
            expected: None,
        },
        StoreVector {
            name: "unknown status",
            contents: r#"{"PR-1": {"request_id": "PR-1", "requester": "u", "data_source": "custom",
                "purpose": "p", "status": "approved",
                "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"}}"#,
            expected: None,
        },
        StoreVector {
            name: "missing required field",
            contents: r#"{"PR-1": {"request_id": "PR-1", "requester": "u", "data_source": "custom",
                "status": "pending",
                "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"}}"#,
            expected: None,
        },
        StoreVector {
            name: "unexpected field",
            contents: r#"{"PR-1": {"request_id": "PR-1", "requester": "u", "data_source": "custom",
                "purpose": "p", "status": "pending", "approved": true,
                "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"}}"#,
            expected: None,
        },
        StoreVector {
            name: "updated before created",
            contents: r#"{"PR-1": {"request_id": "PR-1", "requester": "u", "data_source": "custom",
                "purpose": "p", "status": "granted", "granted_by": "Admin",
                "created_at": "2024-01-02T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"}}"#,
            expected: None,
        },
        StoreVector {
            name: "unparsable timestamp",
            contents: r#"{"PR-1": {"request_id": "PR-1", "requester": "u", "data_source": "custom",
                "purpose": "p", "status": "pending",
                "created_at": "last tuesday", "updated_at": "2024-01-01T00:00:00Z"}}"#,
            expected: None,
        },
    ]
}

/// Every vector, valid first.
pub fn all_vectors() -> Vec<StoreVector> {
    let mut vectors = valid_vectors();
    vectors.extend(corrupt_vectors());
    vectors
}
