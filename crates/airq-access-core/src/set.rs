//! Request set: the full, insertion-ordered collection of requests.
//!
//! This is both the registry's working state and the persisted document. It
//! serializes as a single JSON object mapping each request id to its request,
//! and deserializing keeps the document's entry order.
//!
//! Stored documents are read leniently: an entry filed under a key other than
//! its own `request_id` is re-keyed, and a repeated id keeps the last value at
//! the first position. Each such fix is reported as a [`LoadAdjustment`].

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;
use crate::request::PermissionRequest;
use crate::types::RequestId;
use crate::validation::validate_request;

/// Insertion-ordered map of request id to request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSet {
    /// Requests in insertion order.
    entries: Vec<PermissionRequest>,

    /// Index: request id -> position in `entries`.
    index: HashMap<RequestId, usize>,
}

impl RequestSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from stored `(key, request)` pairs, validating each.
    ///
    /// Requests are indexed by their own `request_id`, whatever key they were
    /// stored under. Returns the set and every adjustment made on the way.
    pub fn from_entries<I>(entries: I) -> Result<(Self, Vec<LoadAdjustment>), ValidationError>
    where
        I: IntoIterator<Item = (String, PermissionRequest)>,
    {
        let mut set = Self::new();
        let mut adjustments = Vec::new();
        for (key, request) in entries {
            let request_id = request.request_id.clone();
            if key != request_id.as_str() {
                adjustments.push(LoadAdjustment::Rekeyed {
                    key,
                    request_id: request_id.clone(),
                });
            }
            if set.upsert(request)?.is_some() {
                adjustments.push(LoadAdjustment::Replaced(request_id));
            }
        }
        Ok((set, adjustments))
    }

    /// Number of requests.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no requests.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a request with this id exists.
    pub fn contains(&self, request_id: &str) -> bool {
        self.index.contains_key(request_id)
    }

    /// Look up a request by id.
    pub fn get(&self, request_id: &str) -> Option<&PermissionRequest> {
        self.index.get(request_id).map(|&pos| &self.entries[pos])
    }

    /// Look up a request by id for mutation.
    ///
    /// Callers must not change `request_id`.
    pub fn get_mut(&mut self, request_id: &str) -> Option<&mut PermissionRequest> {
        match self.index.get(request_id) {
            Some(&pos) => self.entries.get_mut(pos),
            None => None,
        }
    }

    /// Append a new request.
    pub fn insert(&mut self, request: PermissionRequest) -> Result<(), ValidationError> {
        validate_request(&request)?;
        if self.index.contains_key(&request.request_id) {
            return Err(ValidationError::DuplicateId(request.request_id));
        }

        self.index
            .insert(request.request_id.clone(), self.entries.len());
        self.entries.push(request);
        Ok(())
    }

    /// Insert a request, or replace the one with the same id in place.
    ///
    /// Returns the replaced request, if any.
    pub fn upsert(
        &mut self,
        request: PermissionRequest,
    ) -> Result<Option<PermissionRequest>, ValidationError> {
        validate_request(&request)?;
        match self.index.get(&request.request_id) {
            Some(&pos) => Ok(Some(std::mem::replace(&mut self.entries[pos], request))),
            None => {
                self.index
                    .insert(request.request_id.clone(), self.entries.len());
                self.entries.push(request);
                Ok(None)
            }
        }
    }

    /// Remove a request, keeping the order of the rest.
    pub fn remove(&mut self, request_id: &str) -> Option<PermissionRequest> {
        let pos = self.index.remove(request_id)?;
        let removed = self.entries.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    /// Drop every request.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Iterate requests in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, PermissionRequest> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a RequestSet {
    type Item = &'a PermissionRequest;
    type IntoIter = std::slice::Iter<'a, PermissionRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for RequestSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for request in &self.entries {
            map.serialize_entry(request.request_id.as_str(), request)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RequestSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let StoredEntries(entries) = StoredEntries::deserialize(deserializer)?;
        RequestSet::from_entries(entries)
            .map(|(set, _)| set)
            .map_err(de::Error::custom)
    }
}

/// A change made while building a [`RequestSet`] from stored entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadAdjustment {
    /// The entry was stored under `key` and is now indexed by its own id.
    Rekeyed { key: String, request_id: RequestId },
    /// A later entry with this id replaced an earlier one.
    Replaced(RequestId),
}

impl fmt::Display for LoadAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadAdjustment::Rekeyed { key, request_id } => {
                write!(f, "entry key {key} re-keyed to its request_id {request_id}")
            }
            LoadAdjustment::Replaced(request_id) => {
                write!(f, "duplicate request {request_id}: keeping the last entry")
            }
        }
    }
}

/// Raw `(key, request)` pairs of a stored document, in document order.
///
/// Each request is fully decoded; keys are not yet checked against ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredEntries(pub Vec<(String, PermissionRequest)>);

impl<'de> Deserialize<'de> for StoredEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(StoredEntriesVisitor)
    }
}

struct StoredEntriesVisitor;

impl<'de> Visitor<'de> for StoredEntriesVisitor {
    type Value = StoredEntries;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of request id to permission request")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, request)) = access.next_entry::<String, PermissionRequest>()? {
            entries.push((key, request));
        }
        Ok(StoredEntries(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Action, DataSource, PermissionStatus};
    use chrono::{DateTime, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn request(id: &str, requester: &str) -> PermissionRequest {
        PermissionRequest::new(
            RequestId::from(id),
            requester,
            DataSource::OpenAq,
            "purpose",
            None,
            now(),
        )
    }

    #[test]
    fn test_insert_and_get() {
        let mut set = RequestSet::new();
        set.insert(request("PR-b", "User1")).unwrap();
        set.insert(request("PR-a", "User2")).unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.get("PR-a").unwrap().requester, "User2");
        assert!(set.get("PR-c").is_none());
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut set = RequestSet::new();
        set.insert(request("PR-1", "User1")).unwrap();
        let err = set.insert(request("PR-1", "User2")).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateId(_)));
        assert_eq!(set.get("PR-1").unwrap().requester, "User1");
    }

    #[test]
    fn test_iteration_keeps_insertion_order() {
        let mut set = RequestSet::new();
        for id in ["PR-3", "PR-1", "PR-2"] {
            set.insert(request(id, "u")).unwrap();
        }
        let ids: Vec<&str> = set.iter().map(|r| r.request_id.as_str()).collect();
        assert_eq!(ids, ["PR-3", "PR-1", "PR-2"]);
    }

    #[test]
    fn test_remove_reindexes() {
        let mut set = RequestSet::new();
        for id in ["PR-1", "PR-2", "PR-3"] {
            set.insert(request(id, id)).unwrap();
        }
        let removed = set.remove("PR-1").unwrap();
        assert_eq!(removed.request_id.as_str(), "PR-1");
        assert_eq!(set.get("PR-3").unwrap().requester, "PR-3");
        assert_eq!(set.get("PR-2").unwrap().requester, "PR-2");
        assert!(set.remove("PR-1").is_none());
    }

    #[test]
    fn test_json_document_keeps_order() {
        let mut set = RequestSet::new();
        set.insert(request("PR-z", "u1")).unwrap();
        set.insert(request("PR-a", "u2")).unwrap();
        set.get_mut("PR-a")
            .unwrap()
            .apply(Action::Grant, "Admin", None, now())
            .unwrap();

        let json = serde_json::to_string(&set).unwrap();
        assert!(json.find("PR-z").unwrap() < json.find("PR-a").unwrap());

        let decoded: RequestSet = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, set);
        let ids: Vec<&str> = decoded.iter().map(|r| r.request_id.as_str()).collect();
        assert_eq!(ids, ["PR-z", "PR-a"]);
    }

    fn stored(key: &str, id: &str, requester: &str, status: &str) -> String {
        format!(
            r#""{key}": {{
                "request_id": "{id}", "requester": "{requester}", "data_source": "custom",
                "purpose": "p", "status": "{status}", "granted_by": null,
                "created_at": "2024-01-01T00:00:00+00:00", "updated_at": "2024-01-01T00:00:00+00:00"
            }}"#
        )
    }

    #[test]
    fn test_mismatched_key_is_rekeyed() {
        let json = format!(
            "{{{}, {}}}",
            stored("PR-1", "PR-1", "alice", "pending"),
            stored("legacy-key", "PR-2", "bob", "pending")
        );
        let set: RequestSet = serde_json::from_str(&json).unwrap();
        let ids: Vec<&str> = set.iter().map(|r| r.request_id.as_str()).collect();
        assert_eq!(ids, ["PR-1", "PR-2"]);
        assert_eq!(set.get("PR-2").unwrap().requester, "bob");
        assert!(!set.contains("legacy-key"));
    }

    #[test]
    fn test_from_entries_reports_adjustments() {
        let StoredEntries(entries) = serde_json::from_str(&format!(
            "{{{}, {}, {}}}",
            stored("PR-1", "PR-1", "first", "pending"),
            stored("legacy-key", "PR-2", "bob", "pending"),
            stored("PR-1", "PR-1", "last", "denied")
        ))
        .unwrap();
        assert_eq!(entries.len(), 3);

        let (set, adjustments) = RequestSet::from_entries(entries).unwrap();

        // Last value wins, at the first entry's position.
        let ids: Vec<&str> = set.iter().map(|r| r.request_id.as_str()).collect();
        assert_eq!(ids, ["PR-1", "PR-2"]);
        assert_eq!(set.get("PR-1").unwrap().requester, "last");
        assert_eq!(set.get("PR-1").unwrap().status, PermissionStatus::Denied);

        assert_eq!(
            adjustments,
            [
                LoadAdjustment::Rekeyed {
                    key: "legacy-key".to_owned(),
                    request_id: RequestId::from("PR-2"),
                },
                LoadAdjustment::Replaced(RequestId::from("PR-1")),
            ]
        );
    }

    #[test]
    fn test_from_entries_still_rejects_invalid_requests() {
        let mut bad = request("PR-1", "u");
        bad.updated_at = bad.created_at - chrono::Duration::seconds(1);
        let err = RequestSet::from_entries([("PR-1".to_owned(), bad)]).unwrap_err();
        assert!(matches!(err, ValidationError::TimestampOrder { .. }));
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut set = RequestSet::new();
        for id in ["PR-1", "PR-2"] {
            set.insert(request(id, "old")).unwrap();
        }
        let replaced = set.upsert(request("PR-1", "new")).unwrap();
        assert_eq!(replaced.unwrap().requester, "old");
        assert!(set.upsert(request("PR-3", "u")).unwrap().is_none());

        let ids: Vec<&str> = set.iter().map(|r| r.request_id.as_str()).collect();
        assert_eq!(ids, ["PR-1", "PR-2", "PR-3"]);
        assert_eq!(set.get("PR-1").unwrap().requester, "new");
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(serde_json::from_str::<RequestSet>("[]").is_err());
        assert!(serde_json::from_str::<RequestSet>("null").is_err());
    }

    #[test]
    fn test_decode_empty_object() {
        let set: RequestSet = serde_json::from_str("{}").unwrap();
        assert!(set.is_empty());
    }
}
