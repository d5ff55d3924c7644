//! # DocStore Testkit
//!
//! Test utilities for DocStore.
//!
//! This crate provides:
//! - Test fixtures, sample stores and temporary snapshot files
//! - A recording observer for asserting on store events
//! - A `Member` record covering every marshaled field kind
//! - Property-based test generators using proptest
//! - Golden test utilities for format verification
//!
//! ## Usage
//!
//! ```rust
//! use docstore_testkit::prelude::*;
//!
//! let store = sample_store();
//! let restored = roundtrip_through_file(&store);
//! assert_eq!(restored.document_count(), store.document_count());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod golden;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::golden::*;
}

pub use fixtures::*;
pub use generators::*;
pub use golden::*;
