//! In-memory implementation of the RecordStore trait.
//!
//! This is primarily for testing. It keeps the last saved document as encoded
//! JSON bytes, so loads go through the same decode and validation path as the
//! file store, but nothing touches disk.

use std::io;

use airq_access_core::RequestSet;

use crate::error::{Result, StoreError};
use crate::traits::{decode, encode, RecordStore};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// The stored document, if any.
    document: Option<Vec<u8>>,

    /// When set, saves and destroys fail with a permission error.
    read_only: bool,

    /// Number of successful saves.
    saves: usize,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `document`, valid or not.
    pub fn with_document(document: impl Into<Vec<u8>>) -> Self {
        Self {
            document: Some(document.into()),
            ..Self::default()
        }
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// The raw stored document.
    pub fn document(&self) -> Option<&[u8]> {
        self.document.as_deref()
    }

    /// How many saves have succeeded.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "memory store is read-only",
            )));
        }
        Ok(())
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> Result<Option<RequestSet>> {
        match &self.document {
            Some(bytes) => decode(bytes, &self.location()).map(Some),
            None => Ok(None),
        }
    }

    fn save(&mut self, requests: &RequestSet) -> Result<()> {
        self.check_writable()?;
        self.document = Some(encode(requests, false)?);
        self.saves += 1;
        Ok(())
    }

    fn destroy(&mut self) -> Result<()> {
        self.check_writable()?;
        self.document = None;
        Ok(())
    }

    fn exists(&self) -> bool {
        self.document.is_some()
    }

    fn location(&self) -> String {
        "memory".to_owned()
    }
}
