//! PNG-per-key snapshot files in a session-scoped scratch directory.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use image::ImageFormat;
use tracing::debug;
use uuid::Uuid;

use crate::{config::CacheConfig, types::Bitmap};

use super::{CacheError, CacheResult, SnapshotStorage};

/// [`SnapshotStorage`] writing one PNG file per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens storage in `dir`, creating it if needed.
    pub fn open(dir: impl AsRef<Path>) -> CacheResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory holding the snapshot files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.png"))
    }
}

impl SnapshotStorage for FileStorage {
    fn put(&mut self, key: &str, snapshot: &Bitmap) -> CacheResult<()> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.png.tmp"));
        snapshot.save_with_format(&tmp, ImageFormat::Png)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), "snapshot written");
        Ok(())
    }

    fn get(&self, key: &str) -> CacheResult<Option<Bitmap>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let decoded = image::open(&path)?;
        Ok(Some(decoded.into_rgba8()))
    }

    fn contains(&self, key: &str) -> bool {
        self.path_for(key).is_file()
    }

    fn remove(&mut self, key: &str) -> CacheResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(CacheError::Io(err)),
        }
    }
}

/// Scratch directory for one editing session.
///
/// Always a fresh `<uuid>` directory, so concurrent sessions never share
/// snapshot files. It lives under `config.root` when set, otherwise under the
/// user cache dir, e.g. `~/.cache/pickkit/edit-cache/<uuid>` on Linux.
pub fn session_dir(config: &CacheConfig) -> CacheResult<PathBuf> {
    let mut path = match &config.root {
        Some(root) => root.clone(),
        None => {
            let mut base = dirs::cache_dir()
                .or_else(dirs::home_dir)
                .ok_or(CacheError::NoCacheDir)?;
            base.push("pickkit");
            base.push("edit-cache");
            base
        }
    };
    path.push(Uuid::new_v4().to_string());
    Ok(path)
}

/// Best-effort removal of an emptied session directory.
pub fn remove_session_dir(dir: &Path) {
    if let Err(err) = fs::remove_dir(dir) {
        if err.kind() != ErrorKind::NotFound {
            debug!(dir = %dir.display(), %err, "session directory left in place");
        }
    }
}
