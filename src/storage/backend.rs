//! Durable homes for the selection store snapshot.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

/// Errors raised by a snapshot backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] io::Error),
    /// The snapshot could not be encoded.
    #[error("snapshot could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
    /// The backend refused the operation.
    #[error("snapshot storage unavailable: {0}")]
    Unavailable(String),
}

/// A blob store holding a single snapshot.
pub trait SnapshotStorage {
    /// Reads the stored snapshot, or `None` if nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend could not be read.
    fn load(&self) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replaces the stored snapshot with `blob`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot could not be made durable.
    fn save(&self, blob: &[u8]) -> Result<(), StorageError>;
}

/// A snapshot kept in a file.
///
/// Saves go to a sibling temporary file which is synced to disk and then
/// renamed over the target, so the file always holds either the previous or
/// the new snapshot.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Keeps the snapshot at `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The snapshot path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStorage for FileStorage {
    fn load(&self) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, blob: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let staging = self.staging_path();
        {
            let mut file = fs::File::create(&staging)?;
            file.write_all(blob)?;
            file.sync_all()?;
        }
        fs::rename(&staging, &self.path)?;
        tracing::debug!("Saved snapshot to {}", self.path.display());
        Ok(())
    }
}

/// A snapshot kept in memory.
///
/// Clones share the same blob, so a store can be "restarted" by opening a
/// second store over a clone.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blob: Arc<Mutex<Option<Vec<u8>>>>,
}

impl MemoryStorage {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `blob`.
    #[must_use]
    pub fn with_blob(blob: Vec<u8>) -> Self {
        Self {
            blob: Arc::new(Mutex::new(Some(blob))),
        }
    }

    /// The blob currently held.
    #[must_use]
    pub fn blob(&self) -> Option<Vec<u8>> {
        self.blob
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.blob())
    }

    fn save(&self, blob: &[u8]) -> Result<(), StorageError> {
        *self.blob.lock().unwrap_or_else(PoisonError::into_inner) = Some(blob.to_vec());
        Ok(())
    }
}

impl<S: SnapshotStorage + ?Sized> SnapshotStorage for &S {
    fn load(&self) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).load()
    }

    fn save(&self, blob: &[u8]) -> Result<(), StorageError> {
        (**self).save(blob)
    }
}

impl<S: SnapshotStorage + ?Sized> SnapshotStorage for Box<S> {
    fn load(&self) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).load()
    }

    fn save(&self, blob: &[u8]) -> Result<(), StorageError> {
        (**self).save(blob)
    }
}
