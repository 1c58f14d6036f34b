// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod aggregate;
pub mod api;
pub mod metrics;

// ---- Re-exports for stable public API ----
// Convenient access at the crate root: `crate_root::create_router` etc.
pub use crate::aggregate::{Aggregator, AggregatorConfig, FetchBudget, NewsItem};
pub use crate::api::{create_router, AppState};
