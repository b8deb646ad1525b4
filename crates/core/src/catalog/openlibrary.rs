//! OpenLibrary search client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::CatalogConfig;

use super::types::{CandidateRecord, CoverHint};
use super::{Catalog, CatalogError};

const UNKNOWN_TITLE: &str = "Unknown Title";
const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// OpenLibrary search API client.
pub struct OpenLibraryClient {
    client: Client,
    base_url: String,
    request_limit: u32,
}

impl OpenLibraryClient {
    /// Create a new OpenLibrary client.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_limit: config.request_limit,
        })
    }

    /// Build the search URL for a title query.
    fn build_search_url(&self, term: &str) -> String {
        format!(
            "{}/search.json?title={}&limit={}",
            self.base_url,
            urlencoding::encode(term),
            self.request_limit
        )
    }
}

#[async_trait]
impl Catalog for OpenLibraryClient {
    fn name(&self) -> &str {
        "openlibrary"
    }

    async fn search(&self, term: &str) -> Result<Vec<CandidateRecord>, CatalogError> {
        let url = self.build_search_url(term);
        debug!("OpenLibrary search: {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body: Value = response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse search response: {}", e))
        })?;

        Ok(parse_search_response(&body))
    }
}

/// Catalog page URL for a record key such as "/works/OL893415W".
pub fn book_page_url(base_url: &str, key: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), key)
}

/// Extract candidate records from a search response body.
///
/// Each field is read independently: a missing or mistyped field falls back
/// to its default and never drops the whole document.
pub fn parse_search_response(body: &Value) -> Vec<CandidateRecord> {
    body.get("docs")
        .and_then(Value::as_array)
        .map(|docs| docs.iter().map(parse_doc).collect())
        .unwrap_or_default()
}

fn parse_doc(doc: &Value) -> CandidateRecord {
    let key = string_field(doc, "key");
    let title = string_field(doc, "title").unwrap_or_else(|| UNKNOWN_TITLE.to_string());
    let author = first_string(doc, "author_name").unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
    let isbn = first_string(doc, "isbn");
    let year = doc
        .get("first_publish_year")
        .and_then(Value::as_i64)
        .and_then(|y| i32::try_from(y).ok());

    let cover_hint = if let Some(id) = cover_id(doc) {
        CoverHint::CoverId(id)
    } else if let Some(edition_key) = string_field(doc, "cover_edition_key") {
        CoverHint::EditionKey(edition_key)
    } else if let Some(isbn) = &isbn {
        CoverHint::IsbnDerived(isbn.clone())
    } else {
        CoverHint::None
    };

    CandidateRecord {
        key,
        title,
        author,
        cover_hint,
        isbn,
        year,
    }
}

fn cover_id(doc: &Value) -> Option<u64> {
    let id = match doc.get("cover_i")? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    // Older documents use -1 and 0 for "no cover"
    id.filter(|id| *id > 0)
}

fn string_field(doc: &Value, field: &str) -> Option<String> {
    doc.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_string(doc: &Value, field: &str) -> Option<String> {
    doc.get(field)
        .and_then(Value::as_array)
        .and_then(|values| values.first())
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_search_url_encodes_term() {
        let client = OpenLibraryClient::new(&CatalogConfig {
            base_url: "https://openlibrary.org/".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            client.build_search_url("the lord & the rings"),
            "https://openlibrary.org/search.json?title=the%20lord%20%26%20the%20rings&limit=10"
        );
    }

    #[test]
    fn test_parse_full_document() {
        let body = json!({
            "numFound": 1,
            "docs": [{
                "key": "/works/OL893415W",
                "title": "Dune",
                "author_name": ["Frank Herbert", "Someone Else"],
                "cover_i": 11481354,
                "cover_edition_key": "OL26242482M",
                "first_publish_year": 1965,
                "isbn": ["9780441013593", "0441013597"]
            }]
        });

        let records = parse_search_response(&body);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.key.as_deref(), Some("/works/OL893415W"));
        assert_eq!(record.title, "Dune");
        assert_eq!(record.author, "Frank Herbert");
        assert_eq!(record.cover_hint, CoverHint::CoverId(11481354));
        assert_eq!(record.isbn.as_deref(), Some("9780441013593"));
        assert_eq!(record.year, Some(1965));
    }

    #[test]
    fn test_cover_hint_fallback_order() {
        let body = json!({
            "docs": [
                { "title": "A", "cover_edition_key": "OL1M", "isbn": ["111"] },
                { "title": "B", "isbn": ["222", "333"] },
                { "title": "C" }
            ]
        });

        let records = parse_search_response(&body);
        assert_eq!(records[0].cover_hint, CoverHint::EditionKey("OL1M".to_string()));
        assert_eq!(records[1].cover_hint, CoverHint::IsbnDerived("222".to_string()));
        assert_eq!(records[2].cover_hint, CoverHint::None);
        assert!(!records[2].has_cover_source());
    }

    #[test]
    fn test_missing_fields_use_placeholders() {
        let body = json!({ "docs": [{}] });

        let records = parse_search_response(&body);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Unknown Title");
        assert_eq!(records[0].author, "Unknown Author");
        assert_eq!(records[0].key, None);
        assert_eq!(records[0].year, None);
    }

    #[test]
    fn test_mistyped_fields_degrade_individually() {
        let body = json!({
            "docs": [{
                "key": "/works/OL2W",
                "title": 42,
                "author_name": "not a list",
                "cover_i": "98765",
                "first_publish_year": "nineteen",
                "isbn": [null]
            }]
        });

        let records = parse_search_response(&body);
        let record = &records[0];
        assert_eq!(record.key.as_deref(), Some("/works/OL2W"));
        assert_eq!(record.title, "Unknown Title");
        assert_eq!(record.author, "Unknown Author");
        assert_eq!(record.cover_hint, CoverHint::CoverId(98765));
        assert_eq!(record.year, None);
        assert_eq!(record.isbn, None);
    }

    #[test]
    fn test_non_positive_cover_id_is_ignored() {
        let body = json!({ "docs": [{ "title": "X", "cover_i": -1, "isbn": ["444"] }] });

        let records = parse_search_response(&body);
        assert_eq!(records[0].cover_hint, CoverHint::IsbnDerived("444".to_string()));
    }

    #[test]
    fn test_unexpected_shape_yields_no_records() {
        assert!(parse_search_response(&json!({ "docs": "nope" })).is_empty());
        assert!(parse_search_response(&json!([1, 2, 3])).is_empty());
    }

    #[test]
    fn test_book_page_url() {
        assert_eq!(
            book_page_url("https://openlibrary.org/", "/works/OL893415W"),
            "https://openlibrary.org/works/OL893415W"
        );
    }
}
