//! The engine: configuration plus every component built from it.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::{CacheError, CoverCache, EvictionReport, EvictionSweeper};
use crate::catalog::{Catalog, CatalogError, OpenLibraryClient};
use crate::config::{validate_config, Config, ConfigError};
use crate::metrics;
use crate::cover::{CoverError, CoverResolver, CoverSource, HttpCoverSource};
use crate::orchestrator::{QueryOrchestrator, ResultItem};

/// Errors raised while building an engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Failed to create catalog client: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Failed to create cover client: {0}")]
    Cover(#[from] CoverError),
}

/// Explicitly constructed process state: no component reaches for globals.
pub struct Engine {
    config: Config,
    cache: Arc<CoverCache>,
    orchestrator: QueryOrchestrator,
    sweeper: EvictionSweeper,
}

impl Engine {
    /// Build an engine talking to the configured HTTP endpoints.
    pub async fn new(config: Config) -> Result<Self, EngineError> {
        let catalog = Arc::new(OpenLibraryClient::new(&config.catalog)?);
        let covers = Arc::new(HttpCoverSource::new(&config.covers)?);
        Self::with_backends(config, catalog, covers).await
    }

    /// Build an engine with the given catalog and cover source.
    pub async fn with_backends(
        config: Config,
        catalog: Arc<dyn Catalog>,
        cover_source: Arc<dyn CoverSource>,
    ) -> Result<Self, EngineError> {
        validate_config(&config)?;

        let cache = Arc::new(CoverCache::open(&config.cache.dir, config.cache.min_valid_bytes).await?);
        info!("Cover cache at {:?}", cache.root());

        let resolver = Arc::new(CoverResolver::new(
            Arc::clone(&cache),
            cover_source,
            &config.covers.base_url,
        ));

        let orchestrator = QueryOrchestrator::new(
            catalog,
            resolver,
            config.catalog.max_results,
            config.icons.app_icon.clone(),
            config.icons.default_cover.clone(),
        );

        let sweeper = EvictionSweeper::new(
            Arc::clone(&cache),
            config.cache.max_age(),
            config.cache.sweep_interval(),
        );

        Ok(Self {
            config,
            cache,
            orchestrator,
            sweeper,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &CoverCache {
        &self.cache
    }

    /// Answer a search term with display items.
    ///
    /// Waits for a startup sweep in progress, so a cache hit is never an
    /// entry that sweep is about to delete.
    pub async fn handle_query(&self, term: &str) -> Vec<ResultItem> {
        self.sweeper.wait_for_initial_sweep().await;
        self.orchestrator.handle_query(term).await
    }

    /// Start background eviction.
    pub async fn start_eviction(&self) {
        self.sweeper.start().await;
    }

    /// Run one eviction sweep on the caller's task.
    pub async fn sweep_now(&self) -> EvictionReport {
        self.sweeper.sweep_now().await
    }

    /// Stop background work, abandoning a sweep that outlives the grace period.
    pub async fn shutdown(&self) {
        self.sweeper.stop(self.config.cache.shutdown_grace()).await;

        match metrics::gather_text() {
            Ok(text) => debug!("Metrics at shutdown:\n{}", text),
            Err(e) => warn!("Failed to gather metrics: {}", e),
        }
    }
}
