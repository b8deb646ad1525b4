//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the catalog and cover
//! traits, allowing the query path to be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use shelfcover_core::testing::{fixtures, MockCatalog, MockCoverSource};
//!
//! let catalog = MockCatalog::new();
//! let covers = MockCoverSource::new();
//!
//! catalog.set_results(vec![fixtures::candidate_record("Dune", Some(42))]).await;
//! covers.set_response("https://covers.example.org/b/id/42-M.jpg", fixtures::cover_bytes(4096)).await;
//!
//! // Build an Engine with Engine::with_backends(...)
//! ```

mod mock_catalog;
mod mock_cover_provider;
mod mock_cover_source;

pub use mock_catalog::MockCatalog;
pub use mock_cover_provider::MockCoverProvider;
pub use mock_cover_source::MockCoverSource;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{CandidateRecord, CoverHint};

    /// Create a candidate record with a numeric cover id (or no hint).
    ///
    /// The catalog key is derived from the id: `/works/OL<id>W`.
    pub fn candidate_record(title: &str, cover_id: Option<u64>) -> CandidateRecord {
        CandidateRecord {
            key: Some(format!("/works/OL{}W", cover_id.unwrap_or(0))),
            title: title.to_string(),
            author: "Test Author".to_string(),
            cover_hint: cover_id.map_or(CoverHint::None, CoverHint::CoverId),
            isbn: None,
            year: None,
        }
    }

    /// JPEG-looking bytes of the given length.
    pub fn cover_bytes(len: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; len];
        for (dst, src) in bytes.iter_mut().zip([0xFF, 0xD8, 0xFF, 0xE0]) {
            *dst = src;
        }
        bytes
    }
}
