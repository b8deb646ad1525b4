//! Routing launcher requests to the engine.

use tracing::{info, warn};

use shelfcover_core::{book_page_url, Engine, OPEN_PAGE_METHOD};

use crate::browser::PageOpener;
use crate::protocol::{Request, Response};

/// Handle one request. `None` means the method is unknown and nothing is written.
pub async fn handle_request(
    engine: &Engine,
    opener: &dyn PageOpener,
    request: &Request,
) -> Option<Response> {
    if request.is_query() {
        let term = request.first_str().unwrap_or_default();
        return Some(Response::items(engine.handle_query(term).await));
    }

    if request.method == OPEN_PAGE_METHOD {
        return Some(open_page(engine, opener, request.first_str()));
    }

    warn!("Ignoring unknown method {:?}", request.method);
    None
}

fn open_page(engine: &Engine, opener: &dyn PageOpener, key: Option<&str>) -> Response {
    let key = match key.filter(|k| !k.is_empty()) {
        Some(key) => key,
        None => return Response::message("No book key provided"),
    };

    let url = book_page_url(&engine.config().catalog.base_url, key);
    match opener.open(&url) {
        Ok(()) => {
            info!("Opened {}", url);
            Response::message(format!("Opened: {}", url))
        }
        Err(e) => {
            warn!("Failed to open {}: {}", url, e);
            Response::message(format!("Failed to open book page: {}", e))
        }
    }
}
