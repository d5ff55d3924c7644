//! File-based snapshot backend for persistent storage.

use crate::backend::SnapshotBackend;
use crate::error::{StorageError, StorageResult};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Suffix appended to the target file name while an atomic replace is in flight.
const TEMP_SUFFIX: &str = ".tmp";

/// A file-based snapshot backend.
///
/// The file handle is acquired per operation and released before the
/// operation returns. Data survives process restarts.
///
/// # Durability
///
/// `write_all` pushes the payload through a buffered writer, flushes it,
/// and calls `File::sync_all()` before returning. With atomic replace
/// enabled (the default) the payload is written to a sibling temp file
/// which is then renamed over the target, and the parent directory is
/// synced so the rename itself is durable. A crash therefore leaves
/// either the previous snapshot or the new one, never a torn file.
///
/// # Example
///
/// ```no_run
/// use docstore_storage::{SnapshotBackend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::new(Path::new("store.json"));
/// backend.write_all(b"{\"collections\":{}}").unwrap();
/// let data = backend.read_all().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
    atomic_replace: bool,
    create_dirs: bool,
}

impl FileBackend {
    /// Creates a backend for the file at `path`.
    ///
    /// The file is not touched until the first read or write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            atomic_replace: true,
            create_dirs: false,
        }
    }

    /// Sets whether writes go through a temp file and rename.
    #[must_use]
    pub fn atomic_replace(mut self, value: bool) -> Self {
        self.atomic_replace = value;
        self
    }

    /// Sets whether missing parent directories are created on write.
    #[must_use]
    pub fn create_dirs(mut self, value: bool) -> Self {
        self.create_dirs = value;
        self
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if the snapshot file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn temp_path(&self) -> StorageResult<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| StorageError::InvalidPath {
                path: self.path.clone(),
            })?;
        let mut temp_name = OsString::from(file_name);
        temp_name.push(TEMP_SUFFIX);
        Ok(self.path.with_file_name(temp_name))
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    fn write_synced(path: &Path, data: &[u8]) -> StorageResult<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(data)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }

    /// Syncs the parent directory so that a rename is durable.
    ///
    /// Windows NTFS journals metadata updates and does not support
    /// opening a directory for fsync, so this is a no-op there.
    #[cfg(unix)]
    fn sync_parent_dir(&self) -> StorageResult<()> {
        let dir = match self.parent_dir() {
            Some(parent) => File::open(parent)?,
            None => File::open(".")?,
        };
        dir.sync_all()?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_parent_dir(&self) -> StorageResult<()> {
        Ok(())
    }
}

impl SnapshotBackend for FileBackend {
    fn read_all(&self) -> StorageResult<Vec<u8>> {
        let file = File::open(&self.path)?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(data)
    }

    fn write_all(&mut self, data: &[u8]) -> StorageResult<()> {
        if self.create_dirs {
            if let Some(parent) = self.parent_dir() {
                fs::create_dir_all(parent)?;
            }
        }

        if !self.atomic_replace {
            return Self::write_synced(&self.path, data);
        }

        let temp_path = self.temp_path()?;
        if let Err(err) = Self::write_synced(&temp_path, data) {
            let _ = fs::remove_file(&temp_path);
            return Err(err);
        }
        if let Err(err) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }
        self.sync_parent_dir()
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(fs::metadata(&self.path)?.len())
    }
}
