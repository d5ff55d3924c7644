//! Store observers.
//!
//! The core never writes logs itself. Collections and stores report
//! what happened to a [`StoreObserver`] at a fixed set of extension
//! points, enabling:
//! - Structured logging (the default, via [`TracingObserver`])
//! - Audit trails
//! - Test assertions on emitted events
//!
//! # Usage
//!
//! ```rust
//! use docstore_core::{NoopObserver, Store};
//! use std::sync::Arc;
//!
//! // Silence all store events
//! let store = Store::with_observer(Arc::new(NoopObserver));
//! assert!(store.is_empty());
//! ```

use crate::collection::CollectionConfig;
use crate::error::CoreError;
use tracing::{debug, error, info, warn};

/// Type of a successful document write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    /// Document was inserted (no previous version existed).
    Insert,
    /// Document was updated (previous version existed).
    Update,
    /// Document was deleted.
    Delete,
}

impl ChangeType {
    /// Returns the lowercase name of the change.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Receives store events.
///
/// Every hook has an empty default body, so implementors only override
/// the events they care about. Hooks are called synchronously after the
/// in-memory state has changed (or the failure has been decided) and
/// must not panic.
pub trait StoreObserver: Send + Sync {
    /// A collection was created.
    fn collection_created(&self, _name: &str, _config: &CollectionConfig) {}

    /// A collection and all its documents were removed.
    fn collection_deleted(&self, _name: &str, _documents: usize) {}

    /// A collection operation (create, lookup, delete) failed.
    fn collection_failed(&self, _name: &str, _error: &CoreError) {}

    /// A document was inserted, updated or deleted.
    fn document_changed(&self, _collection: &str, _key: &str, _change: ChangeType) {}

    /// A document write was rejected by validation.
    fn write_failed(&self, _collection: &str, _error: &CoreError) {}

    /// A delete referenced a missing document.
    fn delete_failed(&self, _collection: &str, _key: &str, _error: &CoreError) {}

    /// A lookup referenced a missing document.
    fn lookup_failed(&self, _collection: &str, _key: &str) {}

    /// A snapshot was encoded.
    fn dump_completed(&self, _collections: usize, _bytes: usize) {}

    /// A store was rebuilt from a snapshot.
    fn restore_succeeded(&self, _collections: usize, _documents: usize) {}

    /// A restore was aborted; no store was produced.
    fn restore_failed(&self, _error: &CoreError) {}
}

/// An observer that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StoreObserver for NoopObserver {}

/// An observer that emits `tracing` events.
///
/// Successful mutations are logged at `info`, lookups of missing keys
/// at `warn`, and rejected writes and failed restores at `error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl StoreObserver for TracingObserver {
    fn collection_created(&self, name: &str, config: &CollectionConfig) {
        info!(collection = name, primary_key = %config.primary_key(), "collection created");
    }

    fn collection_deleted(&self, name: &str, documents: usize) {
        info!(collection = name, documents, "collection deleted");
    }

    fn collection_failed(&self, name: &str, error: &CoreError) {
        warn!(collection = name, %error, "collection operation failed");
    }

    fn document_changed(&self, collection: &str, key: &str, change: ChangeType) {
        match change {
            ChangeType::Insert => info!(collection, key, "document created"),
            ChangeType::Update => info!(collection, key, "document updated"),
            ChangeType::Delete => info!(collection, key, "document deleted"),
        }
    }

    fn write_failed(&self, collection: &str, error: &CoreError) {
        error!(collection, %error, "failed to put document");
    }

    fn delete_failed(&self, collection: &str, key: &str, error: &CoreError) {
        warn!(collection, key, %error, "failed to delete document");
    }

    fn lookup_failed(&self, collection: &str, key: &str) {
        warn!(collection, key, "document not found");
    }

    fn dump_completed(&self, collections: usize, bytes: usize) {
        debug!(collections, bytes, "store dump completed");
    }

    fn restore_succeeded(&self, collections: usize, documents: usize) {
        info!(collections, documents, "store restored from snapshot");
    }

    fn restore_failed(&self, error: &CoreError) {
        error!(%error, "store restore failed");
    }
}
