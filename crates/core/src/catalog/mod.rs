//! Book catalog search.
//!
//! The catalog is queried once per search term. Failures never reach the
//! query path: [`search_or_empty`] degrades them to an empty list.

mod openlibrary;
mod types;

pub use openlibrary::{book_page_url, parse_search_response, OpenLibraryClient};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::metrics::CATALOG_SEARCHES;

/// Errors that can occur when searching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (timeout, DNS, connection).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Trait for catalog search backends.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Search for books by title.
    async fn search(&self, term: &str) -> Result<Vec<CandidateRecord>, CatalogError>;
}

/// Search the catalog, degrading every failure to an empty list.
///
/// Blank terms return immediately without contacting the backend. At most
/// `max_results` records are returned, in catalog order.
pub async fn search_or_empty(
    catalog: &dyn Catalog,
    term: &str,
    max_results: usize,
) -> Vec<CandidateRecord> {
    let term = term.trim();
    if term.is_empty() {
        CATALOG_SEARCHES.with_label_values(&["empty_term"]).inc();
        return Vec::new();
    }

    debug!(catalog = catalog.name(), "Searching for: {}", term);

    match catalog.search(term).await {
        Ok(mut records) => {
            CATALOG_SEARCHES.with_label_values(&["ok"]).inc();
            records.truncate(max_results);
            for record in &records {
                debug!(
                    "Book: {}, cover hint: {:?}",
                    record.title, record.cover_hint
                );
            }
            records
        }
        Err(e) => {
            CATALOG_SEARCHES.with_label_values(&["failed"]).inc();
            warn!(catalog = catalog.name(), "Catalog search failed: {}", e);
            Vec::new()
        }
    }
}
