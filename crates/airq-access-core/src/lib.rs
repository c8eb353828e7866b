//! # airq-access core
//!
//! Pure primitives for tracking access to the air-quality upstream data
//! sources: request identifiers, sources, statuses, and the request lifecycle.
//!
//! This crate contains no I/O. It is pure computation over request records.
//!
//! ## Key Types
//!
//! - [`PermissionRequest`] - One access-grant lifecycle instance
//! - [`RequestId`] - Request identifier (`PR-<utc timestamp>-<seq>`)
//! - [`DataSource`] - The closed set of upstream sources
//! - [`PermissionStatus`] - Pending, Granted, Denied, Revoked
//! - [`RequestSet`] - Insertion-ordered collection, also the persisted document
//!
//! ## Lifecycle
//!
//! ```text
//!            grant                 revoke
//!  Pending ---------> Granted ---------------> Revoked
//!     |
//!     | deny
//!     v
//!   Denied
//! ```
//!
//! `Denied` and `Revoked` are terminal. See [`PermissionStatus::apply`].

pub mod error;
pub mod request;
pub mod set;
pub mod types;
pub mod validation;

pub use error::{CoreError, ValidationError};
pub use request::{timestamp, PermissionRequest};
pub use set::{LoadAdjustment, RequestSet, StoredEntries};
pub use types::{Action, DataSource, PermissionStatus, RequestId, REQUEST_ID_PREFIX};
pub use validation::validate_request;
