//! # airq-access store
//!
//! Storage abstraction for the access-request registry. Provides a
//! trait-based interface for whole-document persistence with JSON file and
//! in-memory implementations.
//!
//! ## Overview
//!
//! The store module abstracts request persistence behind the [`RecordStore`]
//! trait, allowing the registry to be storage-agnostic. The primary
//! implementation is [`JsonFileStore`], with [`MemoryStore`] for testing.
//!
//! ## Key Types
//!
//! - [`RecordStore`] - The trait for all storage operations
//! - [`JsonFileStore`] - Single JSON file on disk
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use airq_access_store::{JsonFileStore, RecordStore};
//!
//! let mut store = JsonFileStore::new("data/permissions.json");
//! let requests = store.load().unwrap().unwrap_or_default();
//! store.save(&requests).unwrap();
//! ```
//!
//! ## Design Notes
//!
//! - **Whole-document writes**: every save replaces the full request set
//! - **Atomic replace**: the file store writes a temp file and renames it
//! - **Corruption is reported, not repaired**: callers decide what to do with
//!   [`StoreError::Corrupt`]

pub mod error;
pub mod json;
pub mod memory;
pub mod traits;

pub use error::{Result, StoreError};
pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::{decode, encode, RecordStore};
