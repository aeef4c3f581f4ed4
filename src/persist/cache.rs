use tracing::warn;

use crate::types::Bitmap;

use super::{SnapshotStorage, file::FileStorage};

/// Single-slot undo buffer with a disk tier and an optional memory tier.
///
/// Holds at most one snapshot: every write replaces the previous one, and a
/// destructive read consumes it. Storage failures never propagate; they are
/// logged and read as a miss.
#[derive(Debug)]
pub struct EditCache<S: SnapshotStorage = FileStorage> {
    key: String,
    storage: S,
    memory: Option<Bitmap>,
    keep_in_memory: bool,
}

impl<S: SnapshotStorage> EditCache<S> {
    /// Cache stored under `key` in `storage`. Starts empty, removing any
    /// stale snapshot left under the same key.
    pub fn new(key: impl Into<String>, storage: S, keep_in_memory: bool) -> Self {
        let mut cache = Self {
            key: key.into(),
            storage,
            memory: None,
            keep_in_memory,
        };
        cache.clear();
        cache
    }

    /// Storage key of this cache.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stores `snapshot`, replacing any previous one.
    pub fn write(&mut self, snapshot: Bitmap) {
        if let Err(err) = self.storage.put(&self.key, &snapshot) {
            warn!(key = %self.key, %err, "snapshot write failed");
            // A stale file must not resurface as the latest snapshot.
            if let Err(err) = self.storage.remove(&self.key) {
                warn!(key = %self.key, %err, "stale snapshot removal failed");
            }
        }
        self.memory = self.keep_in_memory.then_some(snapshot);
    }

    /// Returns the current snapshot. With `delete_after_read` the snapshot is
    /// consumed from both tiers.
    pub fn read(&mut self, delete_after_read: bool) -> Option<Bitmap> {
        let snapshot = if delete_after_read {
            self.memory.take()
        } else {
            self.memory.clone()
        };

        let snapshot = snapshot.or_else(|| match self.storage.get(&self.key) {
            Ok(found) => found,
            Err(err) => {
                warn!(key = %self.key, %err, "snapshot read failed");
                None
            }
        });

        if delete_after_read {
            self.remove_from_disk();
        }
        snapshot
    }

    /// True when a snapshot is stored. Does not decode it.
    pub fn has_snapshot(&self) -> bool {
        self.memory.is_some() || self.storage.contains(&self.key)
    }

    /// Drops both tiers.
    pub fn clear(&mut self) {
        self.memory = None;
        self.remove_from_disk();
    }

    /// Backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn remove_from_disk(&mut self) {
        if let Err(err) = self.storage.remove(&self.key) {
            warn!(key = %self.key, %err, "snapshot removal failed");
        }
    }
}

impl<S: SnapshotStorage> Drop for EditCache<S> {
    fn drop(&mut self) {
        self.clear();
    }
}
