//! The registry: create, decide, and query access requests.
//!
//! The registry keeps the full request set in memory and writes all of it to
//! its [`RecordStore`] after every change, before returning to the caller.

use std::path::PathBuf;

use chrono::{DateTime, SubsecRound, Utc};
use tracing::{info, warn};

use airq_access_core::{Action, DataSource, PermissionRequest, RequestId, RequestSet};
use airq_access_store::{JsonFileStore, RecordStore, StoreError};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crate::filter::RequestFilter;

/// The permission request registry.
///
/// Provides a unified API for:
/// - Creating requests
/// - Granting, denying, and revoking them
/// - Querying requests and checking for active grants
/// - Resetting the whole store
///
/// There is no process-wide instance: construct one per store. Only one
/// registry (in one process) should write a given store at a time.
pub struct PermissionRegistry<S: RecordStore = JsonFileStore> {
    /// The storage backend.
    store: S,
    /// All requests, in insertion order.
    requests: RequestSet,
    /// Source of "now" for ids and timestamps.
    clock: fn() -> DateTime<Utc>,
}

impl PermissionRegistry<JsonFileStore> {
    /// Open the JSON store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::new(JsonFileStore::new(path))
    }

    /// Open the JSON store described by `config`.
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        Self::new(JsonFileStore::new(&config.storage_path).with_pretty(config.pretty))
    }

    /// The configuration this registry's store corresponds to.
    pub fn config(&self) -> RegistryConfig {
        RegistryConfig {
            storage_path: self.store.path().to_path_buf(),
            pretty: self.store.is_pretty(),
        }
    }
}

impl<S: RecordStore> PermissionRegistry<S> {
    /// Create a registry over `store`, loading whatever it holds.
    ///
    /// A missing store starts empty. A store that exists but cannot be
    /// decoded is logged and ignored, and the registry starts empty; the bad
    /// document stays in place until the next write replaces it. Other read
    /// failures are returned.
    pub fn new(store: S) -> Result<Self> {
        let requests = load_requests(&store)?;
        Ok(Self {
            store,
            requests,
            clock: Utc::now,
        })
    }

    /// Replace the clock used for ids and timestamps.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give up the registry and return its store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// All requests, in insertion order.
    pub fn requests(&self) -> &RequestSet {
        &self.requests
    }

    /// Number of requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether there are no requests.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a new pending request.
    ///
    /// `requester` and `purpose` are not validated.
    pub fn create(
        &mut self,
        requester: &str,
        data_source: DataSource,
        purpose: &str,
        notes: Option<&str>,
    ) -> Result<PermissionRequest> {
        let now = self.now();
        let request_id = self.next_request_id(now);
        let request = PermissionRequest::new(
            request_id.clone(),
            requester,
            data_source,
            purpose,
            notes.map(str::to_owned),
            now,
        );

        self.requests.insert(request.clone())?;
        if let Err(e) = self.persist() {
            self.requests.remove(request_id.as_str());
            return Err(e);
        }

        info!(
            request_id = %request_id,
            data_source = %data_source,
            requester,
            "created permission request"
        );
        Ok(request)
    }

    /// Grant a pending request.
    ///
    /// # Errors
    /// - [`RegistryError::NotFound`] if `request_id` is unknown.
    /// - [`RegistryError::InvalidTransition`] if the request is not pending.
    pub fn grant(
        &mut self,
        request_id: &str,
        granted_by: &str,
        notes: Option<&str>,
    ) -> Result<PermissionRequest> {
        self.transition(request_id, Action::Grant, granted_by, notes)
    }

    /// Deny a pending request. The denier is recorded in `granted_by`.
    ///
    /// # Errors
    /// - [`RegistryError::NotFound`] if `request_id` is unknown.
    /// - [`RegistryError::InvalidTransition`] if the request is not pending.
    pub fn deny(
        &mut self,
        request_id: &str,
        denied_by: &str,
        notes: Option<&str>,
    ) -> Result<PermissionRequest> {
        self.transition(request_id, Action::Deny, denied_by, notes)
    }

    /// Revoke a granted request. The revoker is recorded in `granted_by`.
    ///
    /// # Errors
    /// - [`RegistryError::NotFound`] if `request_id` is unknown.
    /// - [`RegistryError::InvalidTransition`] if the request is not granted.
    pub fn revoke(
        &mut self,
        request_id: &str,
        revoked_by: &str,
        notes: Option<&str>,
    ) -> Result<PermissionRequest> {
        self.transition(request_id, Action::Revoke, revoked_by, notes)
    }

    /// Delete every request and remove the store location itself.
    pub fn clear_all(&mut self) -> Result<()> {
        self.store.destroy()?;
        let cleared = self.requests.len();
        self.requests.clear();
        info!(cleared, location = %self.store.location(), "cleared all permission requests");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Get a request by id.
    pub fn get(&self, request_id: &str) -> Option<&PermissionRequest> {
        self.requests.get(request_id)
    }

    /// List requests matching `filter`, in insertion order.
    pub fn list(&self, filter: &RequestFilter) -> Vec<&PermissionRequest> {
        self.requests.iter().filter(|r| filter.matches(r)).collect()
    }

    /// List every request, in insertion order.
    pub fn list_all(&self) -> Vec<&PermissionRequest> {
        self.requests.iter().collect()
    }

    /// Whether `requester` holds a currently granted request for `data_source`.
    pub fn has_permission(&self, requester: &str, data_source: DataSource) -> bool {
        self.requests
            .iter()
            .any(|r| r.is_for(requester, data_source) && r.is_granted())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply `action` to a stored request and persist it.
    ///
    /// If the write fails the request is restored to its previous state.
    fn transition(
        &mut self,
        request_id: &str,
        action: Action,
        actor: &str,
        notes: Option<&str>,
    ) -> Result<PermissionRequest> {
        let now = self.now();
        let request = self
            .requests
            .get_mut(request_id)
            .ok_or_else(|| RegistryError::NotFound(RequestId::from(request_id)))?;

        let previous = request.clone();
        request.apply(action, actor, notes.map(str::to_owned), now)?;
        let updated = request.clone();

        if let Err(e) = self.persist() {
            if let Some(slot) = self.requests.get_mut(request_id) {
                *slot = previous;
            }
            return Err(e);
        }

        info!(
            request_id,
            actor,
            status = %updated.status,
            "permission request {}",
            action.target_status()
        );
        Ok(updated)
    }

    /// Current time at the precision timestamps are stored with.
    fn now(&self) -> DateTime<Utc> {
        (self.clock)().trunc_subsecs(6)
    }

    /// Pick an unused id for a request created at `now`.
    ///
    /// The sequence starts at one past the current count and advances past
    /// any id already taken.
    fn next_request_id(&self, now: DateTime<Utc>) -> RequestId {
        let mut seq = self.requests.len() + 1;
        loop {
            let candidate = RequestId::generate(now, seq);
            if !self.requests.contains(candidate.as_str()) {
                return candidate;
            }
            seq += 1;
        }
    }

    /// Write the full request set to the store.
    fn persist(&mut self) -> Result<()> {
        self.store.save(&self.requests)?;
        info!(
            count = self.requests.len(),
            location = %self.store.location(),
            "saved permission requests"
        );
        Ok(())
    }
}

/// Read the initial request set, treating a corrupt store as empty.
fn load_requests<S: RecordStore>(store: &S) -> Result<RequestSet> {
    match store.load() {
        Ok(Some(requests)) => {
            info!(
                count = requests.len(),
                location = %store.location(),
                "loaded permission requests"
            );
            Ok(requests)
        }
        Ok(None) => Ok(RequestSet::new()),
        Err(e @ StoreError::Corrupt { .. }) => {
            warn!("Failed to load permissions: {}", e);
            Ok(RequestSet::new())
        }
        Err(e) => Err(e.into()),
    }
}
