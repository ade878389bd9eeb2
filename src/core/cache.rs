//=========================================================================
// Cache
//=========================================================================
//
// Persistence of player state between sessions.
//
// Stored record:
//   [lives]     count, last_life_lost_at   (optional)
//   [progress]  world, level               (optional, reached level)
//
// Reads never fail: a missing or unreadable record starts a fresh
// player. Writes report errors, which the runtime logs and ignores.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::context::{LivesCache, ProgressCache};

//=== CacheError ==========================================================

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Cache parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Cache serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

//=== CacheBlob ===========================================================

/// Everything the cache holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheBlob {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lives: Option<LivesCache>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<ProgressCache>,
}

//=== Cache ===============================================================

/// Storage backend for [`CacheBlob`].
pub trait Cache {
    fn load(&self) -> CacheBlob;
    fn save_lives(&mut self, lives: &LivesCache) -> Result<(), CacheError>;
    fn save_progress(&mut self, progress: &ProgressCache) -> Result<(), CacheError>;
    fn clear(&mut self) -> Result<(), CacheError>;
}

//=== MemoryCache =========================================================

/// In-process cache, lost on exit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryCache {
    blob: CacheBlob,
}

impl MemoryCache {
    pub fn new(blob: CacheBlob) -> Self {
        Self { blob }
    }
}

impl Cache for MemoryCache {
    fn load(&self) -> CacheBlob {
        self.blob
    }

    fn save_lives(&mut self, lives: &LivesCache) -> Result<(), CacheError> {
        self.blob.lives = Some(*lives);
        Ok(())
    }

    fn save_progress(&mut self, progress: &ProgressCache) -> Result<(), CacheError> {
        self.blob.progress = Some(*progress);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), CacheError> {
        self.blob = CacheBlob::default();
        Ok(())
    }
}

//=== FileCache ===========================================================

/// Cache kept as one TOML document on disk.
///
/// The record is read once when opened and rewritten in full on every
/// save.
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
    blob: CacheBlob,
}

impl FileCache {
    /// Opens the cache at `path`, starting empty if the file is missing
    /// or malformed.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let blob = match Self::read(&path) {
            Ok(blob) => blob,
            Err(CacheError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                debug!(target: "cache", "No cache at {}, starting fresh", path.display());
                CacheBlob::default()
            }
            Err(e) => {
                warn!(target: "cache", "Ignoring cache at {}: {}", path.display(), e);
                CacheBlob::default()
            }
        };
        Self { path, blob }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the record at `path`.
    pub fn read(path: &Path) -> Result<CacheBlob, CacheError> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    fn write(&self) -> Result<(), CacheError> {
        let text = toml::to_string(&self.blob)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Replace the file in one step so a crash never leaves half a record.
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, text)?;
        fs::rename(&staging, &self.path)?;

        debug!(target: "cache", "Wrote cache to {}", self.path.display());
        Ok(())
    }
}

impl Cache for FileCache {
    fn load(&self) -> CacheBlob {
        self.blob
    }

    fn save_lives(&mut self, lives: &LivesCache) -> Result<(), CacheError> {
        self.blob.lives = Some(*lives);
        self.write()
    }

    fn save_progress(&mut self, progress: &ProgressCache) -> Result<(), CacheError> {
        self.blob.progress = Some(*progress);
        self.write()
    }

    fn clear(&mut self) -> Result<(), CacheError> {
        self.blob = CacheBlob::default();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sequencer::Timestamp;

    fn lives() -> LivesCache {
        LivesCache {
            count: 3,
            last_life_lost_at: Some(Timestamp::from_millis(1_700_000_000_000)),
        }
    }

    //--- MemoryCache ------------------------------------------------------

    #[test]
    fn memory_cache_keeps_latest_records() {
        let mut cache = MemoryCache::default();
        cache.save_lives(&lives()).unwrap();
        cache.save_progress(&ProgressCache::new(2, 3)).unwrap();

        let blob = cache.load();
        assert_eq!(blob.lives, Some(lives()));
        assert_eq!(blob.progress, Some(ProgressCache::new(2, 3)));

        cache.clear().unwrap();
        assert_eq!(cache.load(), CacheBlob::default());
    }

    //--- FileCache --------------------------------------------------------

    #[test]
    fn file_cache_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save").join("cache.toml");

        let mut cache = FileCache::open(&path);
        assert_eq!(cache.load(), CacheBlob::default());
        cache.save_lives(&lives()).unwrap();
        cache.save_progress(&ProgressCache::new(1, 4)).unwrap();

        let reopened = FileCache::open(&path);
        assert_eq!(reopened.load().lives, Some(lives()));
        assert_eq!(reopened.load().progress, Some(ProgressCache::new(1, 4)));
    }

    #[test]
    fn file_cache_clear_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.toml");

        let mut cache = FileCache::open(&path);
        cache.save_progress(&ProgressCache::new(1, 2)).unwrap();
        assert!(path.exists());

        cache.clear().unwrap();
        assert!(!path.exists());
        assert_eq!(FileCache::open(&path).load(), CacheBlob::default());

        // Clearing twice is fine.
        cache.clear().unwrap();
    }

    #[test]
    fn malformed_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.toml");
        fs::write(&path, "lives = \"many\"").unwrap();

        assert!(matches!(FileCache::read(&path), Err(CacheError::Parse(_))));
        assert_eq!(FileCache::open(&path).load(), CacheBlob::default());
    }

    #[test]
    fn partial_record_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.toml");
        fs::write(&path, "[progress]\nworld = 2\nlevel = 1\n").unwrap();

        let blob = FileCache::open(&path).load();
        assert_eq!(blob.lives, None);
        assert_eq!(blob.progress, Some(ProgressCache::new(2, 1)));
    }
}
