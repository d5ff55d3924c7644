//! Thread-safe store handle.

use crate::store::Store;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// A cloneable handle to a store shared between threads.
///
/// Readers run concurrently; a writer holds the store exclusively for the
/// duration of its guard. Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<Store>>,
}

impl SharedStore {
    /// Wraps a store for sharing.
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Acquires shared read access.
    pub fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.inner.read()
    }

    /// Acquires exclusive write access.
    pub fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.inner.write()
    }

    /// Unwraps the store if this is the last handle.
    ///
    /// Returns the handle unchanged if other clones are still alive.
    pub fn into_inner(self) -> Result<Store, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl From<Store> for SharedStore {
    fn from(store: Store) -> Self {
        Self::new(store)
    }
}
