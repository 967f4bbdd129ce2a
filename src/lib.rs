//! Redis Cache - an instrumented cache over a key-value store
//!
//! Stores values under random keys while counting and recording every
//! `store` call for replay, and tracks page accesses with expiring counters.

pub mod api;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod pages;
pub mod tasks;

pub use api::AppState;
pub use backend::{KeyValueBackend, MemoryBackend, RedisBackend, SharedBackend};
pub use cache::{InstrumentedCache, Payload, Replay, STORE_OPERATION};
pub use config::{BackendKind, Config};
pub use error::{CacheError, Result};
pub use pages::{HttpFetcher, PageFetcher, PageTracker};
pub use tasks::spawn_cleanup_task;
