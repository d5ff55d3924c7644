//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up test stores,
//! temporary snapshot files and observers that record events.

use docstore_core::{
    ChangeType, CollectionConfig, CoreError, Document, FieldDescriptor, NoopObserver, Number,
    Record, Store, StoreObserver,
};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Creates an empty store that discards all events.
pub fn quiet_store() -> Store {
    Store::with_observer(Arc::new(NoopObserver))
}

/// Creates a store with two populated collections.
///
/// - `users` (primary key `id`): `user:1` Alice, `user:2` Bob
/// - `products` (primary key `sku`): `p-1` with a float price
pub fn sample_store() -> Store {
    let mut store = quiet_store();

    let users = store
        .create_collection("users", CollectionConfig::new("id"))
        .expect("Failed to create users collection");
    users
        .put(
            Document::new()
                .with_field("id", "user:1")
                .with_field("name", "Alice")
                .with_field("age", 25)
                .with_field("admin", true),
        )
        .expect("Failed to put user:1");
    users
        .put(
            Document::new()
                .with_field("id", "user:2")
                .with_field("name", "Bob")
                .with_field("age", 31)
                .with_field("admin", false),
        )
        .expect("Failed to put user:2");

    let products = store
        .create_collection("products", CollectionConfig::new("sku"))
        .expect("Failed to create products collection");
    products
        .put(
            Document::new()
                .with_field("sku", "p-1")
                .with_field("title", "Widget")
                .with_field("price", Number::from_f64(9.5).expect("finite")),
        )
        .expect("Failed to put p-1");

    store
}

/// A record using every supported marshal kind.
///
/// Its document layout matches the `users` collection of [`sample_store`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Member {
    /// Primary key, stored as `id`.
    pub id: String,
    /// Display name, stored as `name`.
    pub name: String,
    /// Age, stored as `age`.
    pub age: i64,
    /// Admin flag, stored as `admin`.
    pub admin: bool,
}

impl Record for Member {
    fn descriptors() -> Vec<FieldDescriptor<Self>> {
        vec![
            FieldDescriptor::text(
                "id",
                |m: &Member| m.id.clone(),
                |m: &mut Member, v| m.id = v,
            ),
            FieldDescriptor::text(
                "name",
                |m: &Member| m.name.clone(),
                |m: &mut Member, v| m.name = v,
            ),
            FieldDescriptor::integer("age", |m: &Member| m.age, |m: &mut Member, v| m.age = v),
            FieldDescriptor::boolean(
                "admin",
                |m: &Member| m.admin,
                |m: &mut Member, v| m.admin = v,
            ),
        ]
    }
}

/// A snapshot file path inside a temporary directory.
///
/// The directory and file are removed when this value is dropped.
pub struct TempSnapshot {
    path: PathBuf,
    _temp_dir: TempDir,
}

impl TempSnapshot {
    /// Creates a path `store.json` inside a fresh temporary directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        Self {
            path: temp_dir.path().join("store.json"),
            _temp_dir: temp_dir,
        }
    }

    /// Returns the snapshot path. The file may not exist yet.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the temporary directory holding the snapshot.
    pub fn dir(&self) -> &Path {
        self._temp_dir.path()
    }
}

impl Default for TempSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

/// Dumps `store` to a temporary file and restores it.
pub fn roundtrip_through_file(store: &Store) -> Store {
    let snapshot = TempSnapshot::new();
    store
        .dump_to_file(snapshot.path())
        .expect("Failed to dump store");
    Store::restore_from_file(snapshot.path()).expect("Failed to restore store")
}

/// An event captured by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A collection was created.
    CollectionCreated {
        /// Collection name.
        name: String,
    },
    /// A collection was deleted.
    CollectionDeleted {
        /// Collection name.
        name: String,
        /// Documents discarded with it.
        documents: usize,
    },
    /// A collection operation failed.
    CollectionFailed {
        /// Collection name.
        name: String,
    },
    /// A document was inserted, updated or deleted.
    DocumentChanged {
        /// Collection name.
        collection: String,
        /// Primary key value.
        key: String,
        /// Kind of change.
        change: ChangeType,
    },
    /// A write was rejected.
    WriteFailed {
        /// Collection name.
        collection: String,
    },
    /// A delete found no document.
    DeleteFailed {
        /// Collection name.
        collection: String,
        /// Requested key.
        key: String,
    },
    /// A lookup found no document.
    LookupFailed {
        /// Collection name.
        collection: String,
        /// Requested key.
        key: String,
    },
    /// A dump finished.
    DumpCompleted {
        /// Number of collections written.
        collections: usize,
    },
    /// A restore finished.
    RestoreSucceeded {
        /// Number of collections restored.
        collections: usize,
        /// Number of documents restored.
        documents: usize,
    },
    /// A restore failed.
    RestoreFailed,
}

/// Observer that records every event it receives.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    /// Creates a shared recording observer.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns a copy of the recorded events.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Removes and returns the recorded events.
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock())
    }

    fn record(&self, event: Event) {
        self.events.lock().push(event);
    }
}

impl StoreObserver for RecordingObserver {
    fn collection_created(&self, name: &str, _config: &CollectionConfig) {
        self.record(Event::CollectionCreated { name: name.into() });
    }

    fn collection_deleted(&self, name: &str, documents: usize) {
        self.record(Event::CollectionDeleted {
            name: name.into(),
            documents,
        });
    }

    fn collection_failed(&self, name: &str, _error: &CoreError) {
        self.record(Event::CollectionFailed { name: name.into() });
    }

    fn document_changed(&self, collection: &str, key: &str, change: ChangeType) {
        self.record(Event::DocumentChanged {
            collection: collection.into(),
            key: key.into(),
            change,
        });
    }

    fn write_failed(&self, collection: &str, _error: &CoreError) {
        self.record(Event::WriteFailed {
            collection: collection.into(),
        });
    }

    fn delete_failed(&self, collection: &str, key: &str, _error: &CoreError) {
        self.record(Event::DeleteFailed {
            collection: collection.into(),
            key: key.into(),
        });
    }

    fn lookup_failed(&self, collection: &str, key: &str) {
        self.record(Event::LookupFailed {
            collection: collection.into(),
            key: key.into(),
        });
    }

    fn dump_completed(&self, collections: usize, _bytes: usize) {
        self.record(Event::DumpCompleted { collections });
    }

    fn restore_succeeded(&self, collections: usize, documents: usize) {
        self.record(Event::RestoreSucceeded {
            collections,
            documents,
        });
    }

    fn restore_failed(&self, _error: &CoreError) {
        self.record(Event::RestoreFailed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_store_contents() {
        let store = sample_store();
        assert_eq!(store.len(), 2);
        assert_eq!(store.document_count(), 3);
    }

    #[test]
    fn sample_users_unmarshal_as_members() {
        let store = sample_store();
        let members: Vec<Member> = store
            .get_collection("users")
            .unwrap()
            .list()
            .iter()
            .map(|doc| docstore_core::from_document(doc).unwrap())
            .collect();

        assert_eq!(members[0].name, "Alice");
        assert_eq!(members[0].age, 25);
        assert!(members[0].admin);
        assert!(!members[1].admin);
    }

    #[test]
    fn temp_snapshot_path() {
        let snapshot = TempSnapshot::new();
        assert!(!snapshot.path().exists());
        assert!(snapshot.path().starts_with(snapshot.dir()));
    }

    #[test]
    fn file_roundtrip_preserves_documents() {
        let store = sample_store();
        let restored = roundtrip_through_file(&store);
        assert_eq!(
            restored.get_collection("users").unwrap().list(),
            store.get_collection("users").unwrap().list()
        );
    }

    #[test]
    fn recording_observer_sees_store_events() {
        let observer = RecordingObserver::new();
        let mut store = Store::with_observer(observer.clone());

        let users = store
            .create_collection("users", CollectionConfig::new("id"))
            .unwrap();
        users.put(Document::new().with_field("id", "1")).unwrap();
        users.put(Document::new().with_field("id", "1")).unwrap();
        let _ = users.put(Document::new().with_field("name", "x"));
        let _ = users.get("2");
        users.delete("1").unwrap();
        let _ = users.delete("1");

        let doc_event = |change| Event::DocumentChanged {
            collection: "users".into(),
            key: "1".into(),
            change,
        };
        assert_eq!(
            observer.take(),
            vec![
                Event::CollectionCreated {
                    name: "users".into()
                },
                doc_event(ChangeType::Insert),
                doc_event(ChangeType::Update),
                Event::WriteFailed {
                    collection: "users".into()
                },
                Event::LookupFailed {
                    collection: "users".into(),
                    key: "2".into()
                },
                doc_event(ChangeType::Delete),
                Event::DeleteFailed {
                    collection: "users".into(),
                    key: "1".into()
                },
            ]
        );
        assert!(observer.events().is_empty());
    }

    #[test]
    fn recording_observer_sees_restore_outcome() {
        let data = sample_store().dump().unwrap();

        let observer = RecordingObserver::new();
        Store::restore_from_dump_with_observer(&data, observer.clone()).unwrap();
        assert_eq!(
            observer.events().last(),
            Some(&Event::RestoreSucceeded {
                collections: 2,
                documents: 3
            })
        );

        let observer = RecordingObserver::new();
        assert!(Store::restore_from_dump_with_observer(b"not json", observer.clone()).is_err());
        assert_eq!(observer.events(), vec![Event::RestoreFailed]);
    }
}
