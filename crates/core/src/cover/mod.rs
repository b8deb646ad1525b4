//! Cover image resolution.
//!
//! Covers are keyed inconsistently upstream: sometimes by numeric id,
//! sometimes by an edition key, sometimes only through an ISBN. Resolution is
//! therefore an ordered trial of candidate URLs, backed by the
//! [`CoverCache`](crate::cache::CoverCache).

mod http;
mod resolver;
mod urls;

pub use http::HttpCoverSource;
pub use resolver::CoverResolver;
pub use urls::cover_urls;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::CandidateRecord;

/// Errors that can occur while fetching or resolving a cover.
#[derive(Debug, Error)]
pub enum CoverError {
    /// HTTP request failed (timeout, DNS, connection).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Cover endpoint returned a non-success status.
    #[error("Cover endpoint returned {status} for {url}")]
    Status { status: u16, url: String },

    /// Resolution failed for a reason other than a missing cover.
    #[error("Cover resolution failed: {0}")]
    Resolution(String),
}

/// Result of resolving a record's cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverResolution {
    /// A validated cover is cached at this path.
    Found(PathBuf),
    /// No cover could be located.
    NotFound,
}

impl CoverResolution {
    /// The icon to display: the cached cover, or `default_icon`.
    pub fn icon_path(&self, default_icon: &Path) -> PathBuf {
        match self {
            CoverResolution::Found(path) => path.clone(),
            CoverResolution::NotFound => default_icon.to_path_buf(),
        }
    }
}

/// Source of raw cover bytes.
#[async_trait]
pub trait CoverSource: Send + Sync {
    /// Fetch the body at `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CoverError>;
}

/// Resolves a record to a cover, as seen by the query orchestrator.
#[async_trait]
pub trait CoverProvider: Send + Sync {
    /// Resolve the cover for `record`.
    ///
    /// An `Err` means the record could not be processed at all; a missing
    /// cover is `Ok(CoverResolution::NotFound)`.
    async fn resolve(&self, record: &CandidateRecord) -> Result<CoverResolution, CoverError>;
}
