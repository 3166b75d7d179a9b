use super::types::{CacheEntry, CacheError};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A file-per-key store for API payloads under a cache directory.
///
/// TTL enforcement lives in the entry itself: `get` treats entries past
/// their expiry as absent.
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        // Keys contain ':' which is illegal on some filesystems
        let file: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", file))
    }

    /// Look up a key, returning `None` on miss, expiry, or a corrupt entry
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        let path = self.entry_path(key);
        let file = File::open(&path).ok()?;

        let entry: CacheEntry = match serde_json::from_reader(BufReader::new(file)) {
            Ok(e) => e,
            Err(e) => {
                warn!(key = %key, "Discarding corrupt cache entry: {}", e);
                return None;
            }
        };

        if entry.is_expired() {
            debug!(key = %key, "Cache entry expired");
            return None;
        }

        debug!(key = %key, "Cache hit");
        Some(entry)
    }

    /// Persist an entry, creating the cache directory on first use.
    ///
    /// Writes go to a temp file first and are renamed into place so a
    /// concurrent reader never observes a torn entry.
    pub fn put(&self, key: &str, entry: &CacheEntry) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.entry_path(key);
        let temp_path = path.with_extension("json.tmp");

        {
            let file = File::create(&temp_path)?;
            serde_json::to_writer(BufWriter::new(file), entry)?;
        }
        fs::rename(&temp_path, &path)?;

        debug!(key = %key, path = ?path, "Cached entry");
        Ok(())
    }

    #[allow(dead_code)]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
