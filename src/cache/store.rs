//! JSON-backed fingerprint cache store.
//!
//! # Overview
//!
//! The store holds a `path -> CacheEntry` mapping behind a mutex. The full
//! mapping is deserialized once at process start ([`HashCache::load`]) and
//! serialized once at the end ([`HashCache::persist`]); detection workers only
//! touch the in-memory map. Persisting writes a temporary sibling file and
//! renames it over the store, so a crash mid-write never corrupts the
//! previously persisted mapping.
//!
//! A missing or corrupt store file loads as an empty cache. Entries for paths
//! that have disappeared are kept unless a compaction pass is requested.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

use crate::scanner::Fingerprint;

use super::CacheEntry;

/// Errors from cache persistence.
///
/// Load failures are handled internally (empty cache); only
/// [`HashCache::persist`] surfaces an error, and callers report it without
/// discarding the run's in-memory results.
#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    /// Serializing the mapping failed.
    #[error("failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing or renaming the store file failed.
    #[error("failed to write cache store {path}: {source}")]
    Io {
        /// Store path involved
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Persistent fingerprint cache.
///
/// Lookups and stores are serialized through an internal mutex, which gives
/// the single-writer discipline the concurrent detection pass requires.
#[derive(Debug)]
pub struct HashCache {
    store_path: PathBuf,
    entries: Mutex<HashMap<PathBuf, CacheEntry>>,
}

impl HashCache {
    /// Load the cache from `store_path`.
    ///
    /// A missing or unreadable store, or one that fails to deserialize, yields
    /// an empty cache. Corruption is never fatal: the worst case is a full
    /// re-hash of the candidate set.
    #[must_use]
    pub fn load(store_path: &Path) -> Self {
        let entries = match fs::read_to_string(store_path) {
            Ok(content) => match serde_json::from_str::<HashMap<PathBuf, CacheEntry>>(&content) {
                Ok(entries) => {
                    log::debug!(
                        "Loaded {} cache entries from {}",
                        entries.len(),
                        store_path.display()
                    );
                    entries
                }
                Err(e) => {
                    log::warn!(
                        "Cache store {} is corrupt, starting empty: {}",
                        store_path.display(),
                        e
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No cache store at {}, starting empty", store_path.display());
                HashMap::new()
            }
            Err(e) => {
                log::warn!(
                    "Cache store {} unreadable, starting empty: {}",
                    store_path.display(),
                    e
                );
                HashMap::new()
            }
        };

        Self {
            store_path: store_path.to_path_buf(),
            entries: Mutex::new(entries),
        }
    }

    /// Create an empty cache that persists to `store_path`.
    #[must_use]
    pub fn empty(store_path: &Path) -> Self {
        Self {
            store_path: store_path.to_path_buf(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up the fingerprint for `path`, honoring the staleness check.
    ///
    /// Returns the stored fingerprint only if the stored size and modification
    /// time match the given snapshot exactly; otherwise `None`, which forces
    /// the caller to recompute.
    #[must_use]
    pub fn lookup(&self, path: &Path, size: u64, modified: SystemTime) -> Option<Fingerprint> {
        let entries = self.entries.lock().expect("cache mutex poisoned");
        entries
            .get(path)
            .filter(|entry| entry.matches(size, modified))
            .map(|entry| entry.fingerprint)
    }

    /// Insert or overwrite the entry for `path`.
    pub fn store(&self, path: &Path, size: u64, modified: SystemTime, fingerprint: Fingerprint) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.insert(
            path.to_path_buf(),
            CacheEntry::new(size, modified, fingerprint),
        );
    }

    /// Number of entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache mutex poisoned").len()
    }

    /// Check whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop entries whose path is not in `seen`.
    ///
    /// Optional compaction for callers that want to bound growth from deleted
    /// files; never run by default. Returns the number of dropped entries.
    pub fn compact(&self, seen: &std::collections::HashSet<PathBuf>) -> usize {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        let before = entries.len();
        entries.retain(|path, _| seen.contains(path));
        let dropped = before - entries.len();
        if dropped > 0 {
            log::info!("Cache compaction dropped {} stale entries", dropped);
        }
        dropped
    }

    /// Persist the full mapping to the store file.
    ///
    /// Writes a `.tmp` sibling and renames it into place, so the previous
    /// store survives a failed write intact.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when serialization or the write/rename fails.
    /// The in-memory mapping is untouched either way.
    pub fn persist(&self) -> Result<(), CacheError> {
        let entries = self.entries.lock().expect("cache mutex poisoned");
        let content = serde_json::to_string(&*entries)?;

        if let Some(parent) = self.store_path.parent() {
            fs::create_dir_all(parent).map_err(|e| CacheError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let tmp_path = self.store_path.with_extension("tmp");
        fs::write(&tmp_path, content).map_err(|e| CacheError::Io {
            path: tmp_path.clone(),
            source: e,
        })?;
        fs::rename(&tmp_path, &self.store_path).map_err(|e| CacheError::Io {
            path: self.store_path.clone(),
            source: e,
        })?;

        log::debug!(
            "Persisted {} cache entries to {}",
            entries.len(),
            self.store_path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::Duration;
    use tempfile::TempDir;

    fn store_path(dir: &TempDir) -> PathBuf {
        dir.path().join("hashes.json")
    }

    #[test]
    fn test_lookup_miss_on_empty() {
        let dir = TempDir::new().unwrap();
        let cache = HashCache::empty(&store_path(&dir));

        assert!(cache
            .lookup(Path::new("/a"), 10, SystemTime::now())
            .is_none());
    }

    #[test]
    fn test_store_then_lookup() {
        let dir = TempDir::new().unwrap();
        let cache = HashCache::empty(&store_path(&dir));
        let now = SystemTime::now();

        cache.store(Path::new("/a"), 10, now, [7u8; 32]);

        assert_eq!(cache.lookup(Path::new("/a"), 10, now), Some([7u8; 32]));
    }

    #[test]
    fn test_lookup_stale_size() {
        let dir = TempDir::new().unwrap();
        let cache = HashCache::empty(&store_path(&dir));
        let now = SystemTime::now();

        cache.store(Path::new("/a"), 10, now, [7u8; 32]);

        assert!(cache.lookup(Path::new("/a"), 11, now).is_none());
    }

    #[test]
    fn test_lookup_stale_mtime() {
        let dir = TempDir::new().unwrap();
        let cache = HashCache::empty(&store_path(&dir));
        let now = SystemTime::now();

        cache.store(Path::new("/a"), 10, now, [7u8; 32]);

        assert!(cache
            .lookup(Path::new("/a"), 10, now + Duration::from_secs(5))
            .is_none());
    }

    #[test]
    fn test_store_overwrites() {
        let dir = TempDir::new().unwrap();
        let cache = HashCache::empty(&store_path(&dir));
        let now = SystemTime::now();
        let later = now + Duration::from_secs(10);

        cache.store(Path::new("/a"), 10, now, [1u8; 32]);
        cache.store(Path::new("/a"), 12, later, [2u8; 32]);

        assert!(cache.lookup(Path::new("/a"), 10, now).is_none());
        assert_eq!(cache.lookup(Path::new("/a"), 12, later), Some([2u8; 32]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_persist_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        let now = SystemTime::now();

        let cache = HashCache::empty(&path);
        cache.store(Path::new("/a"), 10, now, [3u8; 32]);
        cache.persist().unwrap();

        let reloaded = HashCache::load(&path);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.lookup(Path::new("/a"), 10, now), Some([3u8; 32]));
    }

    #[test]
    fn test_load_missing_store_is_empty() {
        let dir = TempDir::new().unwrap();
        let cache = HashCache::load(&store_path(&dir));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_load_corrupt_store_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        fs::write(&path, b"{not json at all").unwrap();

        let cache = HashCache::load(&path);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_persist_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deep").join("hashes.json");

        let cache = HashCache::empty(&path);
        cache.store(Path::new("/a"), 1, SystemTime::now(), [0u8; 32]);
        cache.persist().unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_compact_drops_unseen() {
        let dir = TempDir::new().unwrap();
        let cache = HashCache::empty(&store_path(&dir));
        let now = SystemTime::now();

        cache.store(Path::new("/keep"), 1, now, [1u8; 32]);
        cache.store(Path::new("/drop"), 2, now, [2u8; 32]);

        let seen: HashSet<PathBuf> = [PathBuf::from("/keep")].into_iter().collect();
        let dropped = cache.compact(&seen);

        assert_eq!(dropped, 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.lookup(Path::new("/keep"), 1, now).is_some());
    }
}
