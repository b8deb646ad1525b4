//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Catalog searches
//! - Cover cache lookups and eviction
//! - Cover fetch attempts and resolutions
//! - Query handling

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use tracing::warn;

/// Registry holding every core metric.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    for metric in all_metrics() {
        if let Err(e) = registry.register(metric) {
            warn!("Failed to register metric: {}", e);
        }
    }
    registry
});

// =============================================================================
// Catalog
// =============================================================================

/// Catalog searches by result.
pub static CATALOG_SEARCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "shelfcover_catalog_searches_total",
            "Total catalog searches",
        ),
        &["result"], // "ok", "empty_term", "failed"
    )
    .unwrap()
});

// =============================================================================
// Cache
// =============================================================================

/// Cache lookups by outcome.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("shelfcover_cache_lookups_total", "Total cover cache lookups"),
        &["result"], // "hit", "miss", "purged"
    )
    .unwrap()
});

/// Cache files removed by eviction sweeps.
pub static CACHE_EVICTIONS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "shelfcover_cache_evictions_total",
        "Total cache files removed by eviction sweeps",
    )
    .unwrap()
});

// =============================================================================
// Covers
// =============================================================================

/// Individual cover URL attempts by outcome.
pub static COVER_FETCH_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "shelfcover_cover_fetch_attempts_total",
            "Total cover fetch attempts",
        ),
        &["result"], // "valid", "undersized", "failed"
    )
    .unwrap()
});

/// Cover resolutions by outcome.
pub static COVER_RESOLUTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "shelfcover_cover_resolutions_total",
            "Total cover resolutions",
        ),
        &["result"], // "cached", "fetched", "not_found", "no_identifier"
    )
    .unwrap()
});

// =============================================================================
// Queries
// =============================================================================

/// Query handling duration in seconds.
pub static QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "shelfcover_query_duration_seconds",
            "Duration of a full query (search and cover resolution)",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &[],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CATALOG_SEARCHES.clone()),
        Box::new(CACHE_LOOKUPS.clone()),
        Box::new(CACHE_EVICTIONS.clone()),
        Box::new(COVER_FETCH_ATTEMPTS.clone()),
        Box::new(COVER_RESOLUTIONS.clone()),
        Box::new(QUERY_DURATION.clone()),
    ]
}

/// Encode the current values in the Prometheus text format.
pub fn gather_text() -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
