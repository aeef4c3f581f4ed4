/// Single-slot memory+disk snapshot cache used for undo.
pub mod cache;
/// File-per-key storage in a session scratch directory.
pub mod file;

use hashbrown::HashMap;
use thiserror::Error;

use crate::types::Bitmap;

/// Storage failure. Never surfaces from [`cache::EditCache`], which logs it.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem failure.
    #[error("cache io: {0}")]
    Io(#[from] std::io::Error),
    /// Snapshot encoding or decoding failure.
    #[error("cache encoding: {0}")]
    Image(#[from] image::ImageError),
    /// Neither a cache nor a home directory could be found.
    #[error("no cache directory available")]
    NoCacheDir,
}

/// Result alias for storage operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Backing store for the disk tier of an [`cache::EditCache`].
///
/// Encoding is private to the implementation and need not be stable
/// across versions.
pub trait SnapshotStorage: Send {
    /// Stores `snapshot` under `key`, replacing any previous one.
    fn put(&mut self, key: &str, snapshot: &Bitmap) -> CacheResult<()>;
    /// Loads the snapshot under `key`.
    fn get(&self, key: &str) -> CacheResult<Option<Bitmap>>;
    /// Existence check that does not decode the snapshot.
    fn contains(&self, key: &str) -> bool;
    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> CacheResult<()>;
}

/// Keeps snapshots in process memory. For hosts without scratch space, and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, Bitmap>,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStorage for MemoryStorage {
    fn put(&mut self, key: &str, snapshot: &Bitmap) -> CacheResult<()> {
        self.slots.insert(key.to_string(), snapshot.clone());
        Ok(())
    }

    fn get(&self, key: &str) -> CacheResult<Option<Bitmap>> {
        Ok(self.slots.get(key).cloned())
    }

    fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    fn remove(&mut self, key: &str) -> CacheResult<()> {
        self.slots.remove(key);
        Ok(())
    }
}
