//! Persistent cover image cache.
//!
//! Maps a [`CacheKey`] to `<cache_dir>/<key>.jpg`. Lookups validate the file
//! size, writes replace whole files, and an [`EvictionSweeper`] removes
//! entries past their maximum age in the background.

mod store;
mod sweeper;
mod types;

pub use store::CoverCache;
pub use sweeper::EvictionSweeper;
pub use types::*;
