//! Mock cover provider for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::CandidateRecord;
use crate::cover::{CoverError, CoverProvider, CoverResolution};

/// Mock implementation of the CoverProvider trait, keyed by record title.
///
/// Titles without a configured resolution resolve to `NotFound`; titles
/// marked with [`fail_for`](Self::fail_for) return an error.
#[derive(Debug)]
pub struct MockCoverProvider {
    resolutions: Arc<RwLock<HashMap<String, CoverResolution>>>,
    failing: Arc<RwLock<HashSet<String>>>,
    resolved: Arc<RwLock<Vec<String>>>,
}

impl Default for MockCoverProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCoverProvider {
    pub fn new() -> Self {
        Self {
            resolutions: Arc::new(RwLock::new(HashMap::new())),
            failing: Arc::new(RwLock::new(HashSet::new())),
            resolved: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Resolve records titled `title` to `resolution`.
    pub async fn set_resolution(&self, title: &str, resolution: CoverResolution) {
        self.resolutions
            .write()
            .await
            .insert(title.to_string(), resolution);
    }

    /// Fail every record titled `title`.
    pub async fn fail_for(&self, title: &str) {
        self.failing.write().await.insert(title.to_string());
    }

    /// Titles passed to `resolve`, in call order.
    pub async fn resolved_titles(&self) -> Vec<String> {
        self.resolved.read().await.clone()
    }
}

#[async_trait]
impl CoverProvider for MockCoverProvider {
    async fn resolve(&self, record: &CandidateRecord) -> Result<CoverResolution, CoverError> {
        self.resolved.write().await.push(record.title.clone());

        if self.failing.read().await.contains(&record.title) {
            return Err(CoverError::Resolution(format!(
                "simulated failure for '{}'",
                record.title
            )));
        }

        Ok(self
            .resolutions
            .read()
            .await
            .get(&record.title)
            .cloned()
            .unwrap_or(CoverResolution::NotFound))
    }
}
