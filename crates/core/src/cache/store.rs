//! On-disk cover cache.
//!
//! One flat directory of `<key>.jpg` files; the directory listing is the
//! index. Entries are whole files, replaced by rename and never edited in
//! place.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::fs;
use tracing::{debug, info, warn};

use crate::metrics::{CACHE_EVICTIONS, CACHE_LOOKUPS};

use super::types::{CacheError, CacheKey, CacheLookup, EvictionReport};

/// File system backed cover cache.
#[derive(Debug)]
pub struct CoverCache {
    root: PathBuf,
    min_valid_bytes: u64,
}

impl CoverCache {
    /// Opens the cache, creating its directory if needed.
    pub async fn open(root: impl Into<PathBuf>, min_valid_bytes: u64) -> Result<Self, CacheError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|source| CacheError::CreateDir {
                path: root.clone(),
                source,
            })?;

        Ok(Self {
            root,
            min_valid_bytes,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Size a file must exceed to count as a real cover.
    pub fn min_valid_bytes(&self) -> u64 {
        self.min_valid_bytes
    }

    /// Path an entry for `key` lives at (whether or not it exists).
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    /// Looks up a valid entry.
    ///
    /// An existing entry at or below the size threshold is deleted and
    /// reported as absent.
    pub async fn lookup_valid(&self, key: &CacheKey) -> CacheLookup {
        let path = self.path_for(key);

        let meta = match fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    debug!("Failed to stat cache entry {:?}: {}", path, e);
                }
                CACHE_LOOKUPS.with_label_values(&["miss"]).inc();
                return CacheLookup::Absent;
            }
        };

        if !meta.is_file() {
            CACHE_LOOKUPS.with_label_values(&["miss"]).inc();
            return CacheLookup::Absent;
        }

        if meta.len() > self.min_valid_bytes {
            CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
            return CacheLookup::Present(path);
        }

        debug!(
            "Removing undersized cache entry {:?} ({} bytes)",
            path,
            meta.len()
        );
        if let Err(e) = fs::remove_file(&path).await {
            if e.kind() != ErrorKind::NotFound {
                warn!("Failed to remove invalid cache entry {:?}: {}", path, e);
            }
        }
        CACHE_LOOKUPS.with_label_values(&["purged"]).inc();
        CacheLookup::Absent
    }

    /// Writes `bytes` as the entry for `key`, replacing any previous content.
    ///
    /// The data goes to a uniquely named temp file first and is renamed into
    /// place, so readers never observe a partial file.
    pub async fn write(&self, key: &CacheKey, bytes: &[u8]) -> Result<PathBuf, CacheError> {
        let path = self.path_for(key);
        let temp_path = self
            .root
            .join(format!(".{}.{}.part", key.as_str(), uuid::Uuid::new_v4()));

        if let Err(source) = fs::write(&temp_path, bytes).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(CacheError::Write { path, source });
        }

        if let Err(source) = fs::rename(&temp_path, &path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(CacheError::Write { path, source });
        }

        debug!("Cached cover {:?} ({} bytes)", path, bytes.len());
        Ok(path)
    }

    /// Removes every file whose modification time is older than `max_age`.
    ///
    /// Best-effort: a failure on one file is counted and the scan continues.
    pub async fn evict_expired(&self, max_age: Duration) -> EvictionReport {
        let mut report = EvictionReport::new();
        let now = SystemTime::now();

        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to read cache directory {:?}: {}", self.root, e);
                return report;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    debug!("Failed to read cache directory entry: {}", e);
                    report.failed += 1;
                    break;
                }
            };

            let path = entry.path();
            let meta = match entry.metadata().await {
                Ok(meta) => meta,
                Err(e) => {
                    if e.kind() != ErrorKind::NotFound {
                        debug!("Failed to stat {:?}: {}", path, e);
                        report.failed += 1;
                    }
                    continue;
                }
            };
            if !meta.is_file() {
                continue;
            }
            report.scanned += 1;

            let modified = match meta.modified() {
                Ok(modified) => modified,
                Err(e) => {
                    debug!("No modification time for {:?}: {}", path, e);
                    report.failed += 1;
                    continue;
                }
            };

            // Modification times in the future are never expired
            let expired = now
                .duration_since(modified)
                .map(|age| age > max_age)
                .unwrap_or(false);
            if !expired {
                continue;
            }

            match fs::remove_file(&path).await {
                Ok(()) => {
                    debug!("Evicted expired cache entry {:?}", path);
                    report.removed += 1;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    debug!("Failed to evict {:?}: {}", path, e);
                    report.failed += 1;
                }
            }
        }

        CACHE_EVICTIONS.inc_by(report.removed as u64);
        info!(
            scanned = report.scanned,
            removed = report.removed,
            failed = report.failed,
            "Cache eviction sweep finished"
        );

        report
    }
}
