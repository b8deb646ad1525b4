//! Mock cover source for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::cover::{CoverError, CoverSource};

/// Mock implementation of the CoverSource trait.
///
/// URLs with a configured body return it; every other URL fails with a 404.
/// All requested URLs are recorded in order.
#[derive(Debug)]
pub struct MockCoverSource {
    /// Bodies by URL.
    responses: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    /// Requested URLs, in request order.
    requests: Arc<RwLock<Vec<String>>>,
}

impl Default for MockCoverSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCoverSource {
    /// Create a mock source that fails every request.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(HashMap::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Serve `body` for `url`.
    pub async fn set_response(&self, url: &str, body: Vec<u8>) {
        self.responses.write().await.insert(url.to_string(), body);
    }

    /// Get all requested URLs.
    pub async fn requested_urls(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl CoverSource for MockCoverSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CoverError> {
        self.requests.write().await.push(url.to_string());

        self.responses
            .read()
            .await
            .get(url)
            .cloned()
            .ok_or_else(|| CoverError::Status {
                status: 404,
                url: url.to_string(),
            })
    }
}
