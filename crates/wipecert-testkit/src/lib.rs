//! # wipecert testkit
//!
//! Testing utilities for wipecert.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Keys**: Fixed RSA key pairs so signatures are reproducible
//! - **Golden vectors**: Canonical bytes and a signature produced by an independent implementation
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helper structs for setting up test scenarios
//!
//! ## Golden Vectors
//!
//! ```rust
//! use wipecert_testkit::vectors::{sample_certificate, SAMPLE_CANONICAL};
//!
//! assert_eq!(sample_certificate().canonical_bytes(), SAMPLE_CANONICAL.as_bytes());
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use wipecert_testkit::generators::fields_with_shuffled_json;
//!
//! proptest! {
//!     #[test]
//!     fn key_order_is_irrelevant((fields, json) in fields_with_shuffled_json()) {
//!         // parse `json` and compare canonical bytes
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use wipecert_testkit::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let signed = fixture.signed_sample();
//! assert!(wipecert_core::verify(&fixture.verifier, &signed).is_ok());
//! ```

pub mod fixtures;
pub mod generators;
pub mod keys;
pub mod vectors;

pub use fixtures::{receipt_files, temp_file_store, TestFixture};
pub use vectors::{canonical_vectors, sample_certificate, CanonicalVector};
