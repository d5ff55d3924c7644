//! Named registry of collections.

use crate::collection::{Collection, CollectionConfig};
use crate::error::{CoreError, CoreResult};
use crate::observer::{StoreObserver, TracingObserver};
use std::collections::btree_map::{self, Entry};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A named registry of collections.
///
/// The store exclusively owns its collections; deleting a collection
/// discards all of its documents. A store is created empty or rebuilt
/// from a snapshot (see [`Store::restore_from_dump`]).
///
/// `Store` has no internal locking. Mutation goes through `&mut self`;
/// wrap it in a [`crate::SharedStore`] to share it between threads.
///
/// # Example
///
/// ```rust
/// use docstore_core::{CollectionConfig, Document, Store};
///
/// let mut store = Store::new();
/// let users = store.create_collection("users", CollectionConfig::new("id"))?;
/// users.put(Document::new().with_field("id", "1").with_field("name", "Alice"))?;
///
/// assert_eq!(store.get_collection("users")?.len(), 1);
/// # Ok::<(), docstore_core::CoreError>(())
/// ```
pub struct Store {
    /// Collections by name.
    collections: BTreeMap<String, Collection>,
    /// Event sink shared with every collection.
    observer: Arc<dyn StoreObserver>,
}

impl Store {
    /// Creates an empty store that logs through `tracing`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_observer(Arc::new(TracingObserver))
    }

    /// Creates an empty store reporting to the given observer.
    #[must_use]
    pub fn with_observer(observer: Arc<dyn StoreObserver>) -> Self {
        Self {
            collections: BTreeMap::new(),
            observer,
        }
    }

    /// Returns the store's observer.
    #[must_use]
    pub fn observer(&self) -> &Arc<dyn StoreObserver> {
        &self.observer
    }

    /// Creates a new empty collection under `name`.
    ///
    /// A config with an empty primary key counts as absent.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NilValue`] if the config is absent
    /// - [`CoreError::CollectionAlreadyExists`] if the name is taken; the
    ///   existing collection is left untouched
    pub fn create_collection(
        &mut self,
        name: impl Into<String>,
        config: CollectionConfig,
    ) -> CoreResult<&mut Collection> {
        let name = name.into();

        if config.is_empty() {
            let err = CoreError::nil_value("collection config has no primary key");
            self.observer.collection_failed(&name, &err);
            return Err(err);
        }

        match self.collections.entry(name) {
            Entry::Occupied(entry) => {
                let err = CoreError::collection_already_exists(entry.key().as_str());
                self.observer.collection_failed(entry.key(), &err);
                Err(err)
            }
            Entry::Vacant(entry) => {
                self.observer.collection_created(entry.key(), &config);
                let collection = Collection::with_observer(
                    entry.key().as_str(),
                    config,
                    Arc::clone(&self.observer),
                );
                Ok(entry.insert(collection))
            }
        }
    }

    /// Returns the collection named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CollectionNotFound`] if it does not exist.
    pub fn get_collection(&self, name: &str) -> CoreResult<&Collection> {
        match self.collections.get(name) {
            Some(collection) => Ok(collection),
            None => Err(self.not_found(name)),
        }
    }

    /// Returns the collection named `name` for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CollectionNotFound`] if it does not exist.
    pub fn get_collection_mut(&mut self, name: &str) -> CoreResult<&mut Collection> {
        if !self.collections.contains_key(name) {
            return Err(self.not_found(name));
        }
        self.collections
            .get_mut(name)
            .ok_or_else(|| CoreError::collection_not_found(name))
    }

    /// Removes the collection named `name` together with its documents.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CollectionNotFound`] if it does not exist.
    pub fn delete_collection(&mut self, name: &str) -> CoreResult<()> {
        match self.collections.remove(name) {
            Some(collection) => {
                self.observer.collection_deleted(name, collection.len());
                Ok(())
            }
            None => Err(self.not_found(name)),
        }
    }

    /// Returns `true` if a collection with this name exists.
    #[must_use]
    pub fn contains_collection(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    /// Returns the collection names in order.
    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// Iterates over `(name, collection)` pairs in name order.
    pub fn collections(&self) -> btree_map::Iter<'_, String, Collection> {
        self.collections.iter()
    }

    /// Returns the number of collections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Returns `true` if the store has no collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Returns the total number of documents across all collections.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.collections.values().map(Collection::len).sum()
    }

    fn not_found(&self, name: &str) -> CoreError {
        let err = CoreError::collection_not_found(name);
        self.observer.collection_failed(name, &err);
        err
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("collections", &self.collections)
            .finish_non_exhaustive()
    }
}
