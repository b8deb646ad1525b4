//! Query orchestrator implementation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::catalog::{search_or_empty, CandidateRecord, Catalog};
use crate::cover::{CoverError, CoverProvider};
use crate::metrics::QUERY_DURATION;

use super::types::{ResultItem, RpcAction};

/// Sequences catalog search and per-record cover resolution.
pub struct QueryOrchestrator {
    catalog: Arc<dyn Catalog>,
    covers: Arc<dyn CoverProvider>,
    max_results: usize,
    app_icon: PathBuf,
    default_cover: PathBuf,
}

impl QueryOrchestrator {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        covers: Arc<dyn CoverProvider>,
        max_results: usize,
        app_icon: PathBuf,
        default_cover: PathBuf,
    ) -> Self {
        Self {
            catalog,
            covers,
            max_results,
            app_icon,
            default_cover,
        }
    }

    /// Answer a query with display items.
    ///
    /// Records are processed one at a time, in catalog order. A record that
    /// fails is skipped; if nothing remains a single "no results" item is
    /// returned.
    pub async fn handle_query(&self, term: &str) -> Vec<ResultItem> {
        if term.trim().is_empty() {
            return vec![ResultItem::prompt(&self.app_icon)];
        }

        let started = Instant::now();
        let records = search_or_empty(self.catalog.as_ref(), term, self.max_results).await;

        let mut items = Vec::with_capacity(records.len());
        for record in &records {
            match self.process_record(record).await {
                Ok(item) => items.push(item),
                Err(e) => warn!("Error processing book '{}': {}", record.title, e),
            }
        }

        QUERY_DURATION
            .with_label_values(&[])
            .observe(started.elapsed().as_secs_f64());
        info!(
            candidates = records.len(),
            items = items.len(),
            "Query '{}' handled in {:?}",
            term,
            started.elapsed()
        );

        if items.is_empty() {
            items.push(ResultItem::no_results(term, &self.app_icon));
        }

        items
    }

    async fn process_record(&self, record: &CandidateRecord) -> Result<ResultItem, CoverError> {
        let resolution = self.covers.resolve(record).await?;
        let icon = resolution.icon_path(&self.default_cover);
        debug!("Resolved '{}' to {:?}", record.title, icon);

        Ok(ResultItem {
            title: record.title.clone(),
            subtitle: record.subtitle(),
            icon_path: icon.display().to_string(),
            action: Some(RpcAction::open_page(record.key.as_deref())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::cover::CoverResolution;
    use crate::testing::{fixtures, MockCatalog, MockCoverProvider};

    fn orchestrator(
        catalog: &Arc<MockCatalog>,
        covers: &Arc<MockCoverProvider>,
    ) -> QueryOrchestrator {
        QueryOrchestrator::new(
            catalog.clone(),
            covers.clone(),
            5,
            PathBuf::from("/plugin/app.png"),
            PathBuf::from("/plugin/book.png"),
        )
    }

    #[tokio::test]
    async fn test_blank_term_returns_prompt_without_search() {
        let catalog = Arc::new(MockCatalog::new());
        let covers = Arc::new(MockCoverProvider::new());
        let orch = orchestrator(&catalog, &covers);

        for term in ["", "  ", "\t"] {
            let items = orch.handle_query(term).await;
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].title, "OpenLibrary Book Search");
            assert_eq!(items[0].icon_path, "/plugin/app.png");
        }
        assert!(catalog.recorded_queries().await.is_empty());
        assert!(covers.resolved_titles().await.is_empty());
    }

    #[tokio::test]
    async fn test_no_candidates_returns_no_results_item() {
        let catalog = Arc::new(MockCatalog::new());
        let covers = Arc::new(MockCoverProvider::new());
        let orch = orchestrator(&catalog, &covers);

        let items = orch.handle_query("zzzz").await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "No books found for 'zzzz'");
        assert_eq!(items[0].subtitle, "Try a different search term");
        assert!(items[0].action.is_none());
    }

    #[tokio::test]
    async fn test_items_follow_catalog_order() {
        let catalog = Arc::new(MockCatalog::new());
        let covers = Arc::new(MockCoverProvider::new());
        catalog
            .set_results(vec![
                fixtures::candidate_record("Dune", Some(1)),
                fixtures::candidate_record("Dune Messiah", Some(2)),
                fixtures::candidate_record("Dune", Some(3)),
            ])
            .await;
        covers
            .set_resolution("Dune Messiah", CoverResolution::Found(PathBuf::from("/c/2.jpg")))
            .await;
        let orch = orchestrator(&catalog, &covers);

        let items = orch.handle_query("dune").await;
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune", "Dune Messiah", "Dune"]);
        assert_eq!(items[0].icon_path, "/plugin/book.png");
        assert_eq!(items[1].icon_path, "/c/2.jpg");
        assert_eq!(
            items[0].action,
            Some(RpcAction::open_page(Some("/works/OL1W")))
        );
    }

    #[tokio::test]
    async fn test_failed_record_is_skipped() {
        let catalog = Arc::new(MockCatalog::new());
        let covers = Arc::new(MockCoverProvider::new());
        catalog
            .set_results(
                (1..=5)
                    .map(|i| fixtures::candidate_record(&format!("Book {}", i), Some(i)))
                    .collect(),
            )
            .await;
        covers.fail_for("Book 2").await;
        let orch = orchestrator(&catalog, &covers);

        let items = orch.handle_query("book").await;
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Book 1", "Book 3", "Book 4", "Book 5"]);
    }

    #[tokio::test]
    async fn test_all_records_failing_yields_no_results_item() {
        let catalog = Arc::new(MockCatalog::new());
        let covers = Arc::new(MockCoverProvider::new());
        catalog
            .set_results(vec![fixtures::candidate_record("Dune", Some(1))])
            .await;
        covers.fail_for("Dune").await;
        let orch = orchestrator(&catalog, &covers);

        let items = orch.handle_query("dune").await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "No books found for 'dune'");
        assert_eq!(Path::new(&items[0].icon_path), Path::new("/plugin/app.png"));
    }
}
