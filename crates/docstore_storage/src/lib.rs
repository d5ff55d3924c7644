//! # DocStore Storage
//!
//! Snapshot storage backends for DocStore.
//!
//! This crate provides the lowest-level persistence abstraction for DocStore.
//! Backends are **opaque byte stores** holding exactly one snapshot payload -
//! they do not interpret the data they store.
//!
//! ## Design Principles
//!
//! - A backend holds one complete payload, replaced as a whole
//! - `write_all` returns only once the payload is durable
//! - No knowledge of the snapshot format or documents
//! - Must be `Send + Sync` so a store handle can be shared
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral snapshots
//! - [`FileBackend`] - For persistent snapshots using OS file APIs
//!
//! ## Example
//!
//! ```rust
//! use docstore_storage::{SnapshotBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! backend.write_all(b"{\"collections\":{}}").unwrap();
//! assert_eq!(backend.read_all().unwrap(), b"{\"collections\":{}}");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::SnapshotBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
