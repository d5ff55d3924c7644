//! Snapshot backend trait definition.

use crate::error::StorageResult;

/// A low-level snapshot backend for DocStore.
///
/// Snapshot backends are **opaque byte stores** holding a single payload.
/// DocStore owns the snapshot format - backends do not understand
/// collections, documents, or JSON.
///
/// # Invariants
///
/// - `write_all` replaces the previous payload as a whole
/// - `write_all` returns only after the payload is flushed and synced
/// - `read_all` returns exactly the bytes of the last successful `write_all`
/// - Backends must be `Send + Sync` for shared access
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait SnapshotBackend: Send + Sync {
    /// Reads the complete stored payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload does not exist or an I/O error occurs.
    fn read_all(&self) -> StorageResult<Vec<u8>>;

    /// Replaces the stored payload with `data`.
    ///
    /// After this returns successfully, the payload is guaranteed to
    /// survive process termination.
    ///
    /// # Errors
    ///
    /// Returns an error if writing, flushing or syncing fails.
    fn write_all(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Returns the size of the stored payload in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;
}
