//! # DocStore Core
//!
//! Core document store engine for DocStore.
//!
//! This crate provides:
//! - A dynamic document model with typed fields
//! - Primary-key indexed collections with validated writes
//! - A named registry of collections
//! - Record ↔ document marshaling through descriptor tables
//! - JSON snapshots for dump and restore, in memory or on disk
//!
//! ## Design Principles
//!
//! - Every field value carries its own type; there is no untyped value
//! - Reads return owned copies; stored documents only change through `put`
//! - A restore either rebuilds the whole store or fails with no store
//! - Events go through a [`StoreObserver`]; the default logs with `tracing`
//!
//! ## Example
//!
//! ```rust
//! use docstore_core::{CollectionConfig, Document, Store};
//!
//! let mut store = Store::new();
//! let users = store.create_collection("users", CollectionConfig::new("id"))?;
//! users.put(
//!     Document::new()
//!         .with_field("id", "user:1")
//!         .with_field("name", "Alice")
//!         .with_field("age", 25),
//! )?;
//!
//! let snapshot = store.dump()?;
//! let restored = Store::restore_from_dump(&snapshot)?;
//! let alice = restored.get_collection("users")?.get("user:1")?;
//! assert_eq!(alice.get_str("name"), Some("Alice"));
//! # Ok::<(), docstore_core::CoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod collection;
mod config;
mod document;
mod error;
mod marshal;
mod observer;
mod shared;
mod snapshot;
mod store;

pub use collection::{Collection, CollectionConfig};
pub use config::SnapshotConfig;
pub use document::{Document, Field, FieldType, Number};
pub use error::{CoreError, CoreResult};
pub use marshal::{
    from_document, marshal_document, unmarshal_document, FieldAccessor, FieldDescriptor, Record,
};
pub use observer::{ChangeType, NoopObserver, StoreObserver, TracingObserver};
pub use shared::SharedStore;
pub use snapshot::{document_from_json, document_to_json, CollectionSummary, SnapshotSummary};
pub use store::Store;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
