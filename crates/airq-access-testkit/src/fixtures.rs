//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use airq_access::{DataSource, PermissionRegistry, RequestId};

/// File name used for the store inside the fixture directory.
pub const STORE_FILE: &str = "permissions.json";

/// A scratch directory holding one JSON store.
///
/// The directory is removed when the fixture is dropped.
pub struct TestFixture {
    dir: TempDir,
    path: PathBuf,
}

impl TestFixture {
    /// Create a fixture with no store file yet.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join(STORE_FILE);
        Self { dir, path }
    }

    /// Create a fixture whose store file already holds `contents`.
    pub fn with_contents(contents: &str) -> Self {
        let fixture = Self::new();
        fixture.write_raw(contents);
        fixture
    }

    /// The scratch directory.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a registry over the store, as a fresh process would.
    pub fn registry(&self) -> PermissionRegistry {
        PermissionRegistry::open(&self.path).expect("open registry")
    }

    /// Open a registry that reads "now" from `clock`.
    pub fn registry_with_clock(&self, clock: fn() -> DateTime<Utc>) -> PermissionRegistry {
        self.registry().with_clock(clock)
    }

    /// Overwrite the store file.
    pub fn write_raw(&self, contents: &str) {
        fs::write(&self.path, contents).expect("write store file");
    }

    /// Current store file contents.
    pub fn read_raw(&self) -> String {
        fs::read_to_string(&self.path).expect("read store file")
    }

    /// Whether the store file exists.
    pub fn store_exists(&self) -> bool {
        self.path.exists()
    }

    /// Parse the store file as generic JSON.
    pub fn read_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.read_raw()).expect("store file is JSON")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A fixed instant: 2024-02-29T23:59:58Z.
pub fn fixed_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 58).unwrap()
}

/// A clock that runs before [`fixed_clock`].
pub fn earlier_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 12, 31, 12, 0, 0).unwrap()
}

/// Create one pending request per `(requester, data_source)` pair.
pub fn seed_requests(
    registry: &mut PermissionRegistry,
    pairs: &[(&str, DataSource)],
) -> Vec<RequestId> {
    pairs
        .iter()
        .enumerate()
        .map(|(i, (requester, data_source))| {
            registry
                .create(requester, *data_source, &format!("Purpose {}", i + 1), None)
                .expect("create request")
                .request_id
        })
        .collect()
}
