pub mod cache;
pub mod catalog;
pub mod config;
pub mod cover;
pub mod engine;
pub mod metrics;
pub mod orchestrator;
pub mod testing;

pub use cache::{CacheKey, CacheLookup, CoverCache, EvictionReport, EvictionSweeper};
pub use catalog::{
    book_page_url, search_or_empty, CandidateRecord, Catalog, CatalogError, CoverHint,
    OpenLibraryClient,
};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError,
};
pub use cover::{
    cover_urls, CoverError, CoverProvider, CoverResolution, CoverResolver, CoverSource,
    HttpCoverSource,
};
pub use engine::{Engine, EngineError};
pub use orchestrator::{QueryOrchestrator, ResultItem, RpcAction, OPEN_PAGE_METHOD};
