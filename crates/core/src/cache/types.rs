//! Cover cache types.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::catalog::{CandidateRecord, CoverHint};

/// Errors from cache storage operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache directory could not be created.
    #[error("Failed to create cache directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a cache entry failed.
    #[error("Failed to write cache entry {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Filesystem-safe base name of a cache entry.
///
/// Records sharing the same effective identifier map to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build a key from a raw identifier, replacing path separators.
    pub fn new(raw: &str) -> Self {
        Self(raw.replace(['/', '\\'], "_"))
    }

    /// Derive the key for a record: the cover hint first, the ISBN second.
    ///
    /// Returns `None` when the record has neither.
    pub fn for_record(record: &CandidateRecord) -> Option<Self> {
        match &record.cover_hint {
            CoverHint::CoverId(id) => Some(Self::new(&id.to_string())),
            CoverHint::EditionKey(key) => Some(Self::new(key)),
            CoverHint::IsbnDerived(isbn) => Some(Self::new(&format!("isbn_{}", isbn))),
            CoverHint::None => record.isbn.as_deref().map(Self::new),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the entry inside the cache directory.
    pub fn file_name(&self) -> String {
        format!("{}.jpg", self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a validated cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// A valid entry exists at this path.
    Present(PathBuf),
    /// No valid entry (missing, or undersized and purged).
    Absent,
}

/// Summary of one eviction sweep.
#[derive(Debug, Clone)]
pub struct EvictionReport {
    /// Files examined.
    pub scanned: usize,
    /// Files removed because they were older than the max age.
    pub removed: usize,
    /// Files whose stat or removal failed.
    pub failed: usize,
    /// When the sweep started.
    pub swept_at: DateTime<Utc>,
}

impl EvictionReport {
    pub(crate) fn new() -> Self {
        Self {
            scanned: 0,
            removed: 0,
            failed: 0,
            swept_at: Utc::now(),
        }
    }
}
