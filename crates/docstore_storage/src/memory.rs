//! In-memory snapshot backend for testing.

use crate::backend::SnapshotBackend;
use crate::error::StorageResult;
use parking_lot::RwLock;

/// An in-memory snapshot backend.
///
/// This backend keeps the payload in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral stores that don't need persistence
///
/// # Example
///
/// ```rust
/// use docstore_storage::{SnapshotBackend, InMemoryBackend};
///
/// let mut backend = InMemoryBackend::new();
/// backend.write_all(b"test data").unwrap();
/// assert_eq!(backend.size().unwrap(), 9);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    data: RwLock<Vec<u8>>,
    writes: RwLock<u64>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory backend with a pre-existing payload.
    ///
    /// Useful for testing restore scenarios.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data: RwLock::new(data),
            writes: RwLock::new(0),
        }
    }

    /// Returns a copy of the stored payload.
    #[must_use]
    pub fn data(&self) -> Vec<u8> {
        self.data.read().clone()
    }

    /// Returns how many times the payload has been replaced.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        *self.writes.read()
    }
}

impl SnapshotBackend for InMemoryBackend {
    fn read_all(&self) -> StorageResult<Vec<u8>> {
        Ok(self.data.read().clone())
    }

    fn write_all(&mut self, new_data: &[u8]) -> StorageResult<()> {
        let mut data = self.data.write();
        data.clear();
        data.extend_from_slice(new_data);
        *self.writes.write() += 1;
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self.data.read().len() as u64)
    }
}
