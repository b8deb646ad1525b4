//! Result items returned to the host launcher.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Host method that opens a record's catalog page.
pub const OPEN_PAGE_METHOD: &str = "open_openlibrary_page";

/// Action the host invokes when an item is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcAction {
    pub method: String,
    pub parameters: Vec<Value>,
}

impl RpcAction {
    /// Action opening the catalog page for `key` (`null` when unknown).
    pub fn open_page(key: Option<&str>) -> Self {
        Self {
            method: OPEN_PAGE_METHOD.to_string(),
            parameters: vec![key.map_or(Value::Null, |k| Value::String(k.to_string()))],
        }
    }
}

/// One display item, serialized with the host's field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "SubTitle")]
    pub subtitle: String,
    #[serde(rename = "IcoPath")]
    pub icon_path: String,
    #[serde(
        rename = "JsonRPCAction",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub action: Option<RpcAction>,
}

impl ResultItem {
    /// Informational item without an action.
    pub fn placeholder(title: impl Into<String>, subtitle: impl Into<String>, icon: &Path) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            icon_path: icon.display().to_string(),
            action: None,
        }
    }

    /// Item shown for a blank query.
    pub fn prompt(icon: &Path) -> Self {
        Self::placeholder(
            "OpenLibrary Book Search",
            "Start typing a book title to search...",
            icon,
        )
    }

    /// Item shown when a query produced nothing.
    pub fn no_results(term: &str, icon: &Path) -> Self {
        Self::placeholder(
            format!("No books found for '{}'", term),
            "Try a different search term",
            icon,
        )
    }
}
