//! Store snapshots: dump and restore.
//!
//! A snapshot is a complete, restorable copy of a store's collections
//! and documents, encoded as JSON for portability and debuggability.
//!
//! ## Snapshot Format
//!
//! ```text
//! {
//!   "collections": {
//!     "<name>": {
//!       "config": { "primaryKey": "<field>" },
//!       "documents": [ { "<field>": <string | number | bool>, ... }, ... ]
//!     }
//!   }
//! }
//! ```
//!
//! Field types are not encoded separately; they are inferred from the
//! JSON kind of each value. Integers are written as JSON integers and
//! read back exactly; other numbers are written as JSON floats. Any
//! other JSON kind inside a document is rejected when decoding.
//!
//! ## Restore
//!
//! Restore replays the snapshot through the live API: every collection
//! is created with [`Store::create_collection`] and every document is
//! written with [`Collection::put`](crate::Collection::put), so the
//! snapshot gets exactly the validation a live write gets. The first
//! failure aborts the restore and no store is returned.
//!
//! ## Usage
//!
//! ```rust
//! use docstore_core::{CollectionConfig, Document, Store};
//!
//! let mut store = Store::new();
//! store
//!     .create_collection("users", CollectionConfig::new("id"))?
//!     .put(Document::new().with_field("id", "2").with_field("name", "Bob"))?;
//!
//! let bytes = store.dump()?;
//! let restored = Store::restore_from_dump(&bytes)?;
//! assert_eq!(restored.get_collection("users")?.get("2")?.get_str("name"), Some("Bob"));
//! # Ok::<(), docstore_core::CoreError>(())
//! ```

use crate::collection::CollectionConfig;
use crate::config::SnapshotConfig;
use crate::document::{Document, Field, Number};
use crate::error::{CoreError, CoreResult};
use crate::observer::{StoreObserver, TracingObserver};
use crate::store::Store;
use docstore_storage::{FileBackend, SnapshotBackend};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Raw JSON object for one document.
type RawDocument = Map<String, Value>;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    collections: BTreeMap<String, CollectionEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CollectionEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    config: Option<CollectionConfig>,
    #[serde(default)]
    documents: Vec<RawDocument>,
}

impl SnapshotFile {
    fn decode(data: &[u8]) -> CoreResult<Self> {
        serde_json::from_slice(data).map_err(|e| CoreError::decode(e.to_string()))
    }
}

impl Store {
    /// Encodes the store as a compact JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Encode`] if encoding fails.
    pub fn dump(&self) -> CoreResult<Vec<u8>> {
        self.dump_with(&SnapshotConfig::compact())
    }

    /// Encodes the store, honouring `config.pretty`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Encode`] if encoding fails.
    pub fn dump_with(&self, config: &SnapshotConfig) -> CoreResult<Vec<u8>> {
        let mut collections = BTreeMap::new();
        for (name, collection) in self.collections() {
            let documents = collection
                .list()
                .iter()
                .map(document_to_json)
                .collect::<CoreResult<Vec<_>>>()?;
            collections.insert(
                name.clone(),
                CollectionEntry {
                    config: Some(collection.config().clone()),
                    documents,
                },
            );
        }

        let snapshot = SnapshotFile { collections };
        let encoded = if config.pretty {
            serde_json::to_vec_pretty(&snapshot)
        } else {
            serde_json::to_vec(&snapshot)
        };
        let data = encoded.map_err(|e| CoreError::encode(e.to_string()))?;

        self.observer().dump_completed(self.len(), data.len());
        Ok(data)
    }

    /// Rebuilds a store from a snapshot, logging through `tracing`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Decode`] if the payload is not a valid snapshot
    /// - any validation error raised while replaying collections and
    ///   documents; no partially restored store is returned
    pub fn restore_from_dump(data: &[u8]) -> CoreResult<Store> {
        Self::restore_from_dump_with_observer(data, Arc::new(TracingObserver))
    }

    /// Rebuilds a store from a snapshot, reporting to `observer`.
    ///
    /// The observer is attached to the restored store and also receives
    /// the events raised during replay.
    ///
    /// # Errors
    ///
    /// Same as [`Store::restore_from_dump`].
    pub fn restore_from_dump_with_observer(
        data: &[u8],
        observer: Arc<dyn StoreObserver>,
    ) -> CoreResult<Store> {
        let result = SnapshotFile::decode(data)
            .and_then(|snapshot| replay(snapshot, Arc::clone(&observer)));

        match result {
            Ok(store) => {
                observer.restore_succeeded(store.len(), store.document_count());
                Ok(store)
            }
            Err(err) => {
                observer.restore_failed(&err);
                Err(err)
            }
        }
    }

    /// Writes a pretty-printed snapshot to `path`.
    ///
    /// The snapshot is flushed and synced to disk before this returns,
    /// and replaces the target atomically.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] if the file cannot be written or synced.
    pub fn dump_to_file(&self, path: impl AsRef<Path>) -> CoreResult<()> {
        self.dump_to_file_with(path, &SnapshotConfig::default())
    }

    /// Writes a snapshot to `path` using the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] if the file cannot be written or synced.
    pub fn dump_to_file_with(
        &self,
        path: impl AsRef<Path>,
        config: &SnapshotConfig,
    ) -> CoreResult<()> {
        let mut backend = FileBackend::new(path)
            .atomic_replace(config.atomic_replace)
            .create_dirs(config.create_dirs);
        self.dump_to_backend(&mut backend, config)
    }

    /// Writes a snapshot to any backend.
    ///
    /// # Errors
    ///
    /// Returns an encode error or the backend's I/O error.
    pub fn dump_to_backend(
        &self,
        backend: &mut dyn SnapshotBackend,
        config: &SnapshotConfig,
    ) -> CoreResult<()> {
        let data = self.dump_with(config)?;
        backend.write_all(&data)?;
        Ok(())
    }

    /// Reads the complete file at `path` and rebuilds a store from it.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Io`] if the file cannot be opened or read
    /// - otherwise the same as [`Store::restore_from_dump`]
    pub fn restore_from_file(path: impl AsRef<Path>) -> CoreResult<Store> {
        Self::restore_from_backend(&FileBackend::new(path), Arc::new(TracingObserver))
    }

    /// Reads the payload of `backend` and rebuilds a store from it.
    ///
    /// # Errors
    ///
    /// Same as [`Store::restore_from_file`].
    pub fn restore_from_backend(
        backend: &dyn SnapshotBackend,
        observer: Arc<dyn StoreObserver>,
    ) -> CoreResult<Store> {
        let data = match backend.read_all() {
            Ok(data) => data,
            Err(err) => {
                let err = CoreError::from(err);
                observer.restore_failed(&err);
                return Err(err);
            }
        };
        Self::restore_from_dump_with_observer(&data, observer)
    }
}

fn replay(snapshot: SnapshotFile, observer: Arc<dyn StoreObserver>) -> CoreResult<Store> {
    let mut store = Store::with_observer(observer);

    for (name, entry) in snapshot.collections {
        let config = entry
            .config
            .ok_or_else(|| CoreError::nil_value(format!("collection '{name}' has no config")))?;
        let collection = store.create_collection(name, config)?;

        for raw in entry.documents {
            collection.put(document_from_json(raw)?)?;
        }
    }

    Ok(store)
}

/// Summary of a snapshot, read without rebuilding a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotSummary {
    /// Per-collection summaries in name order.
    pub collections: Vec<CollectionSummary>,
    /// Size of the payload in bytes.
    pub size: usize,
}

/// Summary of one collection in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    /// Collection name.
    pub name: String,
    /// Configured primary key, if the entry carries a config.
    pub primary_key: Option<String>,
    /// Number of document entries.
    pub documents: usize,
}

impl SnapshotSummary {
    /// Decodes the snapshot structure and counts its contents.
    ///
    /// Documents are not validated; use [`Store::restore_from_dump`] for that.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Decode`] if the payload is not a snapshot.
    pub fn from_dump(data: &[u8]) -> CoreResult<Self> {
        let snapshot = SnapshotFile::decode(data)?;
        let collections = snapshot
            .collections
            .into_iter()
            .map(|(name, entry)| CollectionSummary {
                name,
                primary_key: entry.config.map(|c| c.primary_key().to_string()),
                documents: entry.documents.len(),
            })
            .collect();

        Ok(Self {
            collections,
            size: data.len(),
        })
    }

    /// Returns the total number of document entries.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.collections.iter().map(|c| c.documents).sum()
    }
}

/// Converts a document into a flat JSON object.
///
/// # Errors
///
/// Returns [`CoreError::Encode`] if a number cannot be represented.
pub fn document_to_json(doc: &Document) -> CoreResult<Map<String, Value>> {
    doc.iter()
        .map(|(name, field)| Ok((name.clone(), field_to_json(name, field)?)))
        .collect()
}

/// Converts a flat JSON object into a document.
///
/// # Errors
///
/// Returns [`CoreError::Decode`] if a value is not a string, number or bool.
pub fn document_from_json(raw: Map<String, Value>) -> CoreResult<Document> {
    raw.into_iter()
        .map(|(name, value)| {
            let field = field_from_json(&name, value)?;
            Ok((name, field))
        })
        .collect()
}

fn field_to_json(name: &str, field: &Field) -> CoreResult<Value> {
    match field {
        Field::String(s) => Ok(Value::String(s.clone())),
        Field::Bool(b) => Ok(Value::Bool(*b)),
        Field::Number(n) => match n.as_i64() {
            Some(i) if n.is_integer() => Ok(Value::from(i)),
            _ => serde_json::Number::from_f64(n.as_f64())
                .map(Value::Number)
                .ok_or_else(|| CoreError::encode(format!("field '{name}' is not a finite number"))),
        },
    }
}

fn field_from_json(name: &str, value: Value) -> CoreResult<Field> {
    match value {
        Value::String(s) => Ok(Field::String(s)),
        Value::Bool(b) => Ok(Field::Bool(b)),
        Value::Number(n) => number_from_json(&n)
            .map(Field::Number)
            .ok_or_else(|| {
                CoreError::decode(format!("field '{name}' holds unsupported number {n}"))
            }),
        Value::Null => Err(unsupported_kind(name, "null")),
        Value::Array(_) => Err(unsupported_kind(name, "array")),
        Value::Object(_) => Err(unsupported_kind(name, "object")),
    }
}

fn number_from_json(n: &serde_json::Number) -> Option<Number> {
    match n.as_i64() {
        Some(i) => Some(Number::from_i64(i)),
        None => n.as_f64().and_then(Number::from_f64),
    }
}

fn unsupported_kind(name: &str, kind: &str) -> CoreError {
    CoreError::decode(format!("field '{name}' holds unsupported JSON {kind}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;
    use docstore_storage::InMemoryBackend;
    use tempfile::tempdir;

    fn quiet() -> Arc<dyn StoreObserver> {
        Arc::new(NoopObserver)
    }

    fn sample_store() -> Store {
        let mut store = Store::with_observer(quiet());
        let users = store
            .create_collection("users", CollectionConfig::new("id"))
            .unwrap();
        users
            .put(
                Document::new()
                    .with_field("id", "user:1")
                    .with_field("name", "Alice")
                    .with_field("age", 25),
            )
            .unwrap();
        users
            .put(
                Document::new()
                    .with_field("id", "user:2")
                    .with_field("name", "Bob")
                    .with_field("admin", true),
            )
            .unwrap();

        let products = store
            .create_collection("products", CollectionConfig::new("sku"))
            .unwrap();
        products
            .put(
                Document::new()
                    .with_field("sku", "p-1")
                    .with_field("price", Number::from_f64(9.99).unwrap()),
            )
            .unwrap();
        store
    }

    /// Wraps `documents` in a snapshot holding one `users` collection keyed by `id`.
    fn users_snapshot(documents: &str) -> String {
        let head = r#"{"collections":{"users":{"config":{"primaryKey":"id"},"documents":["#;
        format!("{head}{documents}]}}}}}}")
    }

    fn assert_same_contents(a: &Store, b: &Store) {
        let names_a: Vec<&str> = a.collection_names().collect();
        let names_b: Vec<&str> = b.collection_names().collect();
        assert_eq!(names_a, names_b);

        for (name, coll) in a.collections() {
            let other = b.get_collection(name).unwrap();
            assert_eq!(coll.config(), other.config());
            assert_eq!(coll.list(), other.list());
        }
    }

    #[test]
    fn dump_empty_store() {
        let store = Store::with_observer(quiet());
        let data = store.dump().unwrap();
        assert_eq!(data, br#"{"collections":{}}"#);
    }

    #[test]
    fn dump_layout() {
        let mut store = Store::with_observer(quiet());
        store
            .create_collection("users", CollectionConfig::new("id"))
            .unwrap()
            .put(
                Document::new()
                    .with_field("id", "1")
                    .with_field("age", 30)
                    .with_field("ok", true),
            )
            .unwrap();

        let data = store.dump().unwrap();
        assert_eq!(
            std::str::from_utf8(&data).unwrap(),
            users_snapshot(r#"{"age":30,"id":"1","ok":true}"#)
        );
    }

    #[test]
    fn dump_and_restore_roundtrip() {
        let store = sample_store();
        let data = store.dump().unwrap();
        let restored = Store::restore_from_dump_with_observer(&data, quiet()).unwrap();
        assert_same_contents(&store, &restored);
    }

    #[test]
    fn users_walkthrough() {
        let mut store = Store::with_observer(quiet());
        let users = store
            .create_collection("users", CollectionConfig::new("id"))
            .unwrap();
        users
            .put(Document::new().with_field("id", "1").with_field("name", "Alice"))
            .unwrap();
        users
            .put(Document::new().with_field("id", "2").with_field("name", "Bob"))
            .unwrap();
        assert_eq!(users.list().len(), 2);

        users.delete("1").unwrap();
        let remaining = users.list();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].get_str("id"), Some("2"));

        let data = store.dump().unwrap();
        let restored = Store::restore_from_dump_with_observer(&data, quiet()).unwrap();
        let bob = restored.get_collection("users").unwrap().get("2").unwrap();
        assert_eq!(bob.get_str("name"), Some("Bob"));
        assert!(matches!(
            restored.get_collection("users").unwrap().get("1"),
            Err(CoreError::DocumentNotFound { .. })
        ));
    }

    #[test]
    fn integers_stay_exact() {
        let mut store = Store::with_observer(quiet());
        store
            .create_collection("c", CollectionConfig::new("id"))
            .unwrap()
            .put(Document::new().with_field("id", "x").with_field("big", i64::MAX))
            .unwrap();

        let data = store.dump().unwrap();
        let restored = Store::restore_from_dump_with_observer(&data, quiet()).unwrap();
        let doc = restored.get_collection("c").unwrap().get("x").unwrap();
        let big = doc.get("big").and_then(Field::as_number).unwrap();
        assert!(big.is_integer());
        assert_eq!(big.as_i64(), Some(i64::MAX));
    }

    #[test]
    fn float_encoded_integers_are_admitted() {
        let data = users_snapshot(r#"{"id":"1","age":25.0}"#);
        let store = Store::restore_from_dump_with_observer(data.as_bytes(), quiet()).unwrap();
        let doc = store.get_collection("users").unwrap().get("1").unwrap();

        let age = doc.get("age").and_then(Field::as_number).unwrap();
        assert_eq!(age, Number::from_i64(25));
        assert_eq!(age.as_i64(), Some(25));
    }

    #[test]
    fn restore_invalid_json() {
        let result = Store::restore_from_dump_with_observer(b"invalid json", quiet());
        assert!(matches!(result, Err(CoreError::Decode { .. })));
    }

    #[test]
    fn restore_requires_collections_key() {
        let result = Store::restore_from_dump_with_observer(b"{}", quiet());
        assert!(matches!(result, Err(CoreError::Decode { .. })));
    }

    #[test]
    fn restore_aborts_on_invalid_document() {
        let data = users_snapshot(r#"{"id":"1"},{"name":"no key"}"#);
        let result = Store::restore_from_dump_with_observer(data.as_bytes(), quiet());
        assert!(matches!(result, Err(CoreError::InvalidPrimaryKey { .. })));
    }

    #[test]
    fn restore_aborts_on_empty_document() {
        let data = users_snapshot(r#"{}"#);
        let result = Store::restore_from_dump_with_observer(data.as_bytes(), quiet());
        assert!(matches!(result, Err(CoreError::NilValue { .. })));
    }

    #[test]
    fn restore_aborts_on_missing_config() {
        let data = br#"{"collections":{"users":{"documents":[]}}}"#;
        let result = Store::restore_from_dump_with_observer(data, quiet());
        assert!(matches!(result, Err(CoreError::NilValue { .. })));
    }

    #[test]
    fn restore_rejects_nested_values() {
        let data = users_snapshot(r#"{"id":"1","tags":["a"]}"#);
        let result = Store::restore_from_dump_with_observer(data.as_bytes(), quiet());
        assert!(matches!(
            result,
            Err(CoreError::Decode { ref message }) if message.contains("array")
        ));

        let data = users_snapshot(r#"{"id":"1","x":null}"#);
        let result = Store::restore_from_dump_with_observer(data.as_bytes(), quiet());
        assert!(matches!(result, Err(CoreError::Decode { .. })));
    }

    #[test]
    fn restore_collection_without_documents() {
        let data = br#"{"collections":{"users":{"config":{"primaryKey":"id"}}}}"#;
        let store = Store::restore_from_dump_with_observer(data, quiet()).unwrap();
        assert!(store.get_collection("users").unwrap().is_empty());
    }

    #[test]
    fn restore_replays_duplicate_keys_as_upserts() {
        let data = users_snapshot(r#"{"id":"1","v":1},{"id":"1","v":2}"#);
        let store = Store::restore_from_dump_with_observer(data.as_bytes(), quiet()).unwrap();
        let coll = store.get_collection("users").unwrap();
        assert_eq!(coll.len(), 1);
        assert_eq!(coll.get("1").unwrap().get("v"), Some(&Field::from(2)));
    }

    #[test]
    fn dump_to_file_and_restore() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = sample_store();

        store.dump_to_file(&path).unwrap();
        assert!(path.exists());
        assert!(!dir.path().join("store.json.tmp").exists());

        let restored = Store::restore_from_file(&path).unwrap();
        assert_same_contents(&store, &restored);
    }

    #[test]
    fn dump_to_file_is_pretty_by_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        sample_store().dump_to_file(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"collections\""));
    }

    #[test]
    fn dump_to_file_with_create_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("backups").join("store.json");

        let config = SnapshotConfig::compact().create_dirs(true);
        sample_store().dump_to_file_with(&path, &config).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn dump_to_missing_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("store.json");

        let result = sample_store().dump_to_file(&path);
        assert!(matches!(result, Err(CoreError::Io(_))));
    }

    #[test]
    fn restore_from_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result = Store::restore_from_file(dir.path().join("nonexistent.json"));
        assert!(matches!(
            result,
            Err(CoreError::Io(ref e)) if e.kind() == std::io::ErrorKind::NotFound
        ));
    }

    #[test]
    fn backend_roundtrip() {
        let store = sample_store();
        let mut backend = InMemoryBackend::new();
        store
            .dump_to_backend(&mut backend, &SnapshotConfig::compact())
            .unwrap();
        assert_eq!(backend.write_count(), 1);

        let restored = Store::restore_from_backend(&backend, quiet()).unwrap();
        assert_same_contents(&store, &restored);
    }

    #[test]
    fn summary_counts_entries() {
        let data = sample_store().dump().unwrap();
        let summary = SnapshotSummary::from_dump(&data).unwrap();

        assert_eq!(summary.collections.len(), 2);
        assert_eq!(summary.collections[0].name, "products");
        assert_eq!(summary.collections[0].primary_key.as_deref(), Some("sku"));
        assert_eq!(summary.collections[1].documents, 2);
        assert_eq!(summary.document_count(), 3);
        assert_eq!(summary.size, data.len());
    }

    #[test]
    fn json_conversion_of_document() {
        let doc = Document::new()
            .with_field("id", "1")
            .with_field("n", Number::from_f64(1.5).unwrap());
        let raw = document_to_json(&doc).unwrap();
        assert_eq!(raw.get("n"), Some(&serde_json::json!(1.5)));
        assert_eq!(document_from_json(raw).unwrap(), doc);
    }
}
