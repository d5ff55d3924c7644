//! Primary-key indexed document collections.

use crate::document::{Document, Field};
use crate::error::{CoreError, CoreResult};
use crate::observer::{ChangeType, StoreObserver, TracingObserver};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Configuration of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Name of the field whose string value keys each document.
    #[serde(rename = "primaryKey")]
    primary_key: String,
}

impl CollectionConfig {
    /// Creates a config keyed by the given field.
    pub fn new(primary_key: impl Into<String>) -> Self {
        Self {
            primary_key: primary_key.into(),
        }
    }

    /// Returns the primary key field name.
    #[must_use]
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Returns `true` if no primary key field is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary_key.is_empty()
    }
}

/// A collection of documents indexed by their primary key.
///
/// Every write is validated: the document must have fields, and the
/// configured primary key field must be a non-empty string. That string
/// is the storage key. No other field is type-checked on write.
///
/// Reads hand out owned copies, so mutating a returned document never
/// touches the stored one.
///
/// # Example
///
/// ```rust
/// use docstore_core::{Collection, CollectionConfig, Document};
///
/// let mut users = Collection::new("users", CollectionConfig::new("id"));
/// users.put(Document::new().with_field("id", "1").with_field("name", "Alice"))?;
///
/// let alice = users.get("1")?;
/// assert_eq!(alice.get_str("name"), Some("Alice"));
/// # Ok::<(), docstore_core::CoreError>(())
/// ```
pub struct Collection {
    /// Collection name, used when reporting events.
    name: String,
    /// Key policy.
    config: CollectionConfig,
    /// Documents by primary key value.
    documents: BTreeMap<String, Document>,
    /// Event sink.
    observer: Arc<dyn StoreObserver>,
}

impl Collection {
    /// Creates an empty collection that logs through `tracing`.
    pub fn new(name: impl Into<String>, config: CollectionConfig) -> Self {
        Self::with_observer(name, config, Arc::new(TracingObserver))
    }

    /// Creates an empty collection reporting to the given observer.
    pub fn with_observer(
        name: impl Into<String>,
        config: CollectionConfig,
        observer: Arc<dyn StoreObserver>,
    ) -> Self {
        Self {
            name: name.into(),
            config,
            documents: BTreeMap::new(),
            observer,
        }
    }

    /// Returns the collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the collection config.
    #[must_use]
    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    /// Stores a document, replacing any document with the same key.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NilValue`] if the document has no fields
    /// - [`CoreError::InvalidPrimaryKey`] if the primary key field is
    ///   missing, not a string, or empty
    pub fn put(&mut self, doc: Document) -> CoreResult<()> {
        let key = match self.primary_key_of(&doc) {
            Ok(key) => key.to_string(),
            Err(err) => {
                self.observer.write_failed(&self.name, &err);
                return Err(err);
            }
        };

        let change = match self.documents.insert(key.clone(), doc) {
            Some(_) => ChangeType::Update,
            None => ChangeType::Insert,
        };
        self.observer.document_changed(&self.name, &key, change);
        Ok(())
    }

    /// Returns a copy of the document stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DocumentNotFound`] if no such document exists.
    pub fn get(&self, key: &str) -> CoreResult<Document> {
        match self.documents.get(key) {
            Some(doc) => Ok(doc.clone()),
            None => {
                self.observer.lookup_failed(&self.name, key);
                Err(CoreError::document_not_found(key))
            }
        }
    }

    /// Removes the document stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DocumentNotFound`] if no such document exists.
    pub fn delete(&mut self, key: &str) -> CoreResult<()> {
        if self.documents.remove(key).is_none() {
            let err = CoreError::document_not_found(key);
            self.observer.delete_failed(&self.name, key, &err);
            return Err(err);
        }

        self.observer
            .document_changed(&self.name, key, ChangeType::Delete);
        Ok(())
    }

    /// Returns copies of all documents.
    ///
    /// The order is not part of the contract. An empty collection
    /// yields an empty vector.
    #[must_use]
    pub fn list(&self) -> Vec<Document> {
        self.documents.values().cloned().collect()
    }

    /// Returns the stored keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    /// Returns `true` if a document is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.documents.contains_key(key)
    }

    /// Returns the number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` if the collection holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn primary_key_of<'d>(&self, doc: &'d Document) -> CoreResult<&'d str> {
        if doc.is_empty() {
            return Err(CoreError::nil_value("document has no fields"));
        }

        let primary_key = self.config.primary_key();
        match doc.get(primary_key) {
            None => Err(CoreError::invalid_primary_key(primary_key, "field is missing")),
            Some(Field::String(value)) if value.is_empty() => {
                Err(CoreError::invalid_primary_key(primary_key, "value is empty"))
            }
            Some(Field::String(value)) => Ok(value.as_str()),
            Some(other) => Err(CoreError::invalid_primary_key(
                primary_key,
                format!("expected string, found {}", other.field_type()),
            )),
        }
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("documents", &self.documents.len())
            .finish_non_exhaustive()
    }
}
