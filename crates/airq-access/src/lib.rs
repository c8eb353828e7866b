//! # airq-access
//!
//! Registry of access requests for the air-quality pipeline's upstream data
//! sources (World Bank indicators API, OpenAQ snapshot, or a custom source).
//!
//! ## Overview
//!
//! A [`PermissionRegistry`] records who asked for access to which source and
//! why, and whether that request was granted, denied, or later revoked. It
//! only records decisions; it does not enforce them.
//!
//! Every change is written through to a [`RecordStore`](store::RecordStore)
//! (by default a single JSON file) before the call returns, and the registry
//! reloads that file when constructed.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use airq_access::{DataSource, PermissionRegistry};
//!
//! fn example() -> airq_access::Result<()> {
//!     let mut registry = PermissionRegistry::open("data/permissions.json")?;
//!
//!     let request = registry.create("alice", DataSource::WorldBankApi, "research", None)?;
//!     registry.grant(request.request_id.as_str(), "admin", None)?;
//!     assert!(registry.has_permission("alice", DataSource::WorldBankApi));
//!
//!     registry.revoke(request.request_id.as_str(), "security", None)?;
//!     assert!(!registry.has_permission("alice", DataSource::WorldBankApi));
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `airq_access::core` - Request types and the lifecycle
//! - `airq_access::store` - Storage abstraction and backends

pub mod config;
pub mod error;
pub mod filter;
pub mod registry;

// Re-export component crates
pub use airq_access_core as core;
pub use airq_access_store as store;

// Re-export main types for convenience
pub use config::RegistryConfig;
pub use error::{RegistryError, Result};
pub use filter::RequestFilter;
pub use registry::PermissionRegistry;

// Re-export commonly used core types
pub use airq_access_core::{
    Action, DataSource, PermissionRequest, PermissionStatus, RequestId, RequestSet,
};
