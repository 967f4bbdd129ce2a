//! Pages Module
//!
//! Page fetching with expiring per-URL access counters.

mod fetch;
mod tracker;

pub use fetch::{HttpFetcher, PageFetcher};
pub use tracker::{count_key, PageTracker, DEFAULT_COUNT_TTL};
