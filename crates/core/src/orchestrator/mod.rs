//! Query orchestration.
//!
//! A query runs end-to-end on one sequential path:
//! - **Search**: one catalog call per query
//! - **Resolve**: one cover resolution per record, never in parallel, so a
//!   query never has two cache writes in flight

mod query;
mod types;

pub use query::QueryOrchestrator;
pub use types::{ResultItem, RpcAction, OPEN_PAGE_METHOD};
