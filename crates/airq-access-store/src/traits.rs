//! Store trait: the abstract interface for request persistence.
//!
//! This trait allows the registry to be storage-agnostic. Implementations
//! include a JSON file (primary) and in-memory (for tests).

use airq_access_core::{RequestSet, StoredEntries};
use tracing::warn;

use crate::error::{Result, StoreError};

/// The RecordStore trait: whole-document persistence of a [`RequestSet`].
///
/// # Design Notes
///
/// - **Full-state writes**: `save` replaces the stored document entirely.
///   There are no partial updates and no append log.
/// - **Absent vs corrupt**: `load` returns `Ok(None)` when nothing has been
///   stored and [`StoreError::Corrupt`] when something is stored but unreadable.
/// - **No locking**: a single writer is assumed. Two processes saving to the
///   same location lose updates (last writer wins).
pub trait RecordStore {
    /// Read the full stored request set.
    ///
    /// # Returns
    /// - `Ok(None)` if the store location does not exist.
    /// - `Ok(Some(set))` if it exists and decodes.
    /// - `Err(StoreError::Corrupt)` if it exists but does not decode or validate.
    /// - `Err(StoreError::Io)` for any other read failure.
    fn load(&self) -> Result<Option<RequestSet>>;

    /// Overwrite the store with `requests`.
    fn save(&mut self, requests: &RequestSet) -> Result<()>;

    /// Remove the store location entirely. Succeeds if it is already absent.
    fn destroy(&mut self) -> Result<()>;

    /// Whether the store location currently exists.
    fn exists(&self) -> bool;

    /// Human-readable location, for logs and errors.
    fn location(&self) -> String;
}

/// Encode a request set as a JSON document.
pub fn encode(requests: &RequestSet, pretty: bool) -> Result<Vec<u8>> {
    let encoded = if pretty {
        serde_json::to_vec_pretty(requests)
    } else {
        serde_json::to_vec(requests)
    };
    encoded.map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Decode a JSON document read from `location`.
///
/// Entries filed under the wrong key, or repeated, are accepted and logged.
/// Anything that does not parse or validate is [`StoreError::Corrupt`].
pub fn decode(bytes: &[u8], location: &str) -> Result<RequestSet> {
    let corrupt = |reason: String| StoreError::Corrupt {
        location: location.to_owned(),
        reason,
    };

    let StoredEntries(entries) =
        serde_json::from_slice(bytes).map_err(|e| corrupt(e.to_string()))?;
    let (requests, adjustments) =
        RequestSet::from_entries(entries).map_err(|e| corrupt(e.to_string()))?;

    for adjustment in &adjustments {
        warn!(location, "{}", adjustment);
    }
    Ok(requests)
}
