//! # airq-access testkit
//!
//! Testing utilities for the permission registry.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Store vectors**: Known store documents with the load outcome they must produce
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A scratch directory holding one JSON store
//!
//! ## Store Vectors
//!
//! ```rust
//! use airq_access_testkit::vectors::all_vectors;
//! use airq_access_testkit::TestFixture;
//!
//! for vector in all_vectors() {
//!     let fixture = TestFixture::with_contents(vector.contents);
//!     let registry = fixture.registry();
//!     if vector.is_corrupt() {
//!         assert!(registry.is_empty(), "{}", vector.name);
//!     }
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use airq_access_testkit::generators::{request_from_params, RequestParams};
//!
//! proptest! {
//!     #[test]
//!     fn updated_never_precedes_created(params: RequestParams) {
//!         let request = request_from_params(&params);
//!         prop_assert!(request.updated_at >= request.created_at);
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{fixed_clock, seed_requests, TestFixture};
pub use generators::{request_from_params, Op, RequestParams};
pub use vectors::{all_vectors, corrupt_vectors, valid_vectors, StoreVector};
