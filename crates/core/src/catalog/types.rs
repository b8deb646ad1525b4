//! Types for catalog search results.

/// The identifier a candidate offers for locating its cover image.
///
/// Chosen once at parse time so downstream code matches on the tag instead of
/// re-inspecting strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverHint {
    /// Numeric cover id (`cover_i`).
    CoverId(u64),
    /// Edition key (`cover_edition_key`), served through the id endpoint.
    EditionKey(String),
    /// No cover id is known; the first ISBN stands in for one.
    IsbnDerived(String),
    /// Nothing usable.
    None,
}

impl CoverHint {
    /// Identifier usable with the id-keyed cover endpoint, if any.
    pub fn id_value(&self) -> Option<String> {
        match self {
            CoverHint::CoverId(id) => Some(id.to_string()),
            CoverHint::EditionKey(key) => Some(key.clone()),
            CoverHint::IsbnDerived(_) | CoverHint::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, CoverHint::None)
    }
}

/// One search hit from the catalog, prior to cover resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    /// Opaque catalog key (e.g. "/works/OL893415W").
    pub key: Option<String>,
    /// Book title.
    pub title: String,
    /// First-listed author.
    pub author: String,
    /// Identifier used to locate the cover.
    pub cover_hint: CoverHint,
    /// First-listed ISBN.
    pub isbn: Option<String>,
    /// First publish year.
    pub year: Option<i32>,
}

impl CandidateRecord {
    /// Whether the record carries anything a cover could be located by.
    pub fn has_cover_source(&self) -> bool {
        !self.cover_hint.is_none() || self.isbn.is_some()
    }

    /// Display subtitle: "by <author>" plus the year when known.
    pub fn subtitle(&self) -> String {
        match self.year {
            Some(year) => format!("by {} ({})", self.author, year),
            None => format!("by {}", self.author),
        }
    }
}
