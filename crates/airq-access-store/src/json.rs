//! JSON file implementation of the RecordStore trait.
//!
//! This is the primary storage backend. The whole request set lives in one
//! JSON object file. Writes go to a temporary file in the same directory,
//! which is synced and then renamed over the target, so readers never see a
//! half-written document.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use airq_access_core::RequestSet;

use crate::error::{Result, StoreError};
use crate::traits::{decode, encode, RecordStore};

/// Single-file JSON store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    /// Path of the JSON document.
    path: PathBuf,

    /// Whether to pretty-print (two-space indent) on save.
    pretty: bool,
}

impl JsonFileStore {
    /// Use the JSON document at `path`, pretty-printed on save.
    ///
    /// Nothing is touched on disk until the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: true,
        }
    }

    /// Choose between pretty and compact output.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// The document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether saves are pretty-printed.
    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    /// Directory that holds the document (and its temporary files).
    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> Result<Option<RequestSet>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        decode(&bytes, &self.location()).map(Some)
    }

    fn save(&mut self, requests: &RequestSet) -> Result<()> {
        let bytes = encode(requests, self.pretty)?;
        let dir = self.dir();
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        debug!(
            path = %self.path.display(),
            requests = requests.len(),
            bytes = bytes.len(),
            "wrote request store"
        );
        Ok(())
    }

    fn destroy(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
