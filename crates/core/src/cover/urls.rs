//! Candidate cover URLs for a record.

use crate::catalog::{CandidateRecord, CoverHint};

/// Ordered, de-duplicated list of cover URLs to try for `record`.
///
/// Priority:
/// 1. id-keyed medium, then large (numeric id or edition key)
/// 2. ISBN-keyed medium, for the record's ISBN
/// 3. ISBN-keyed medium, for an ISBN-derived hint
pub fn cover_urls(base_url: &str, record: &CandidateRecord) -> Vec<String> {
    let base_url = base_url.trim_end_matches('/');
    let mut urls = Vec::new();

    if let Some(id) = record.cover_hint.id_value() {
        let id = urlencoding::encode(&id);
        urls.push(format!("{}/b/id/{}-M.jpg", base_url, id));
        urls.push(format!("{}/b/id/{}-L.jpg", base_url, id));
    }

    if let Some(isbn) = &record.isbn {
        urls.push(isbn_url(base_url, isbn));
    }

    if let CoverHint::IsbnDerived(isbn) = &record.cover_hint {
        urls.push(isbn_url(base_url, isbn));
    }

    let mut seen = std::collections::HashSet::new();
    urls.retain(|url| seen.insert(url.clone()));
    urls
}

fn isbn_url(base_url: &str, isbn: &str) -> String {
    format!("{}/b/isbn/{}-M.jpg", base_url, urlencoding::encode(isbn))
}
