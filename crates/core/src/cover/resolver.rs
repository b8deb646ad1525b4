//! Cover resolver: cache lookup, ordered fetch, write-back.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::cache::{CacheKey, CacheLookup, CoverCache};
use crate::catalog::CandidateRecord;
use crate::metrics::{COVER_FETCH_ATTEMPTS, COVER_RESOLUTIONS};

use super::urls::cover_urls;
use super::{CoverError, CoverProvider, CoverResolution, CoverSource};

/// Turns a record's cover identifiers into a cached cover file.
pub struct CoverResolver {
    cache: Arc<CoverCache>,
    source: Arc<dyn CoverSource>,
    base_url: String,
}

impl CoverResolver {
    pub fn new(cache: Arc<CoverCache>, source: Arc<dyn CoverSource>, base_url: &str) -> Self {
        Self {
            cache,
            source,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve the cover for `record`.
    ///
    /// A warm cache answers without touching the network. On a miss, the
    /// candidate URLs are tried in priority order and the first body larger
    /// than the cache's size threshold is written back. Every failure ends
    /// in [`CoverResolution::NotFound`].
    pub async fn resolve(&self, record: &CandidateRecord) -> CoverResolution {
        let Some(key) = CacheKey::for_record(record) else {
            COVER_RESOLUTIONS.with_label_values(&["no_identifier"]).inc();
            return CoverResolution::NotFound;
        };

        if let CacheLookup::Present(path) = self.cache.lookup_valid(&key).await {
            debug!("Cover cache hit for {}: {:?}", key, path);
            COVER_RESOLUTIONS.with_label_values(&["cached"]).inc();
            return CoverResolution::Found(path);
        }

        let Some(bytes) = self.fetch_first_valid(record).await else {
            COVER_RESOLUTIONS.with_label_values(&["not_found"]).inc();
            return CoverResolution::NotFound;
        };

        match self.cache.write(&key, &bytes).await {
            Ok(path) => {
                COVER_RESOLUTIONS.with_label_values(&["fetched"]).inc();
                CoverResolution::Found(path)
            }
            Err(e) => {
                warn!("Failed to cache cover for {}: {}", key, e);
                COVER_RESOLUTIONS.with_label_values(&["not_found"]).inc();
                CoverResolution::NotFound
            }
        }
    }

    /// Try each candidate URL in order, returning the first valid body.
    async fn fetch_first_valid(&self, record: &CandidateRecord) -> Option<Vec<u8>> {
        let min_valid_bytes = self.cache.min_valid_bytes();

        for url in cover_urls(&self.base_url, record) {
            debug!("Trying to download: {}", url);

            match self.source.fetch(&url).await {
                Ok(bytes) if bytes.len() as u64 > min_valid_bytes => {
                    COVER_FETCH_ATTEMPTS.with_label_values(&["valid"]).inc();
                    debug!("Downloaded cover from {} ({} bytes)", url, bytes.len());
                    return Some(bytes);
                }
                Ok(bytes) => {
                    COVER_FETCH_ATTEMPTS.with_label_values(&["undersized"]).inc();
                    debug!(
                        "Rejected placeholder from {} ({} bytes)",
                        url,
                        bytes.len()
                    );
                }
                Err(e) => {
                    COVER_FETCH_ATTEMPTS.with_label_values(&["failed"]).inc();
                    debug!("Failed to download from {}: {}", url, e);
                }
            }
        }

        None
    }
}

#[async_trait]
impl CoverProvider for CoverResolver {
    async fn resolve(&self, record: &CandidateRecord) -> Result<CoverResolution, CoverError> {
        Ok(CoverResolver::resolve(self, record).await)
    }
}
