//! Mock catalog for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::{CandidateRecord, Catalog, CatalogError};

/// Mock implementation of the Catalog trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable search results
/// - Track search terms for assertions
/// - Simulate failures
///
/// # Example
///
/// ```rust,ignore
/// use shelfcover_core::testing::{MockCatalog, fixtures};
///
/// let catalog = MockCatalog::new();
/// catalog.set_results(vec![fixtures::candidate_record("Dune", Some(1))]).await;
///
/// let records = catalog.search("dune").await?;
/// assert_eq!(records.len(), 1);
/// assert_eq!(catalog.recorded_queries().await, vec!["dune".to_string()]);
/// ```
#[derive(Debug)]
pub struct MockCatalog {
    /// Configured results to return.
    results: Arc<RwLock<Vec<CandidateRecord>>>,
    /// Recorded search terms.
    queries: Arc<RwLock<Vec<String>>>,
    /// If set, the next search will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalog {
    /// Create a new mock catalog with empty results.
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(Vec::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the results returned by every search.
    pub async fn set_results(&self, results: Vec<CandidateRecord>) {
        *self.results.write().await = results;
    }

    /// Get all recorded search terms.
    pub async fn recorded_queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, term: &str) -> Result<Vec<CandidateRecord>, CatalogError> {
        self.queries.write().await.push(term.to_string());

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        Ok(self.results.read().await.clone())
    }
}
