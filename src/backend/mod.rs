//! Backend Module
//!
//! The key-value store the cache and the page tracker are built on.
//! Two implementations share one trait: a Redis client and an in-process
//! memory store with the same command semantics.

mod entry;
mod memory;
mod redis_backend;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

pub use entry::{StoreEntry, StoredData};
pub use memory::{MemoryBackend, MemoryStore};
pub use redis_backend::RedisBackend;

/// Shared handle to a backend, owned by whoever needs the connection.
pub type SharedBackend = Arc<dyn KeyValueBackend>;

// == Key-Value Backend ==
/// Commands the cache needs from a key-value store.
///
/// Names and semantics follow Redis: `incr` treats an absent key as 0,
/// `lrange` accepts negative indices counted from the end, and `set`
/// clears any pending expiry on the key.
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// Writes `value` under `key`, replacing any previous value and TTL.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Reads the value under `key`, `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Increments the integer under `key` by one and returns the new value.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Appends `item` to the list under `key`, returning the new length.
    async fn rpush(&self, key: &str, item: Vec<u8>) -> Result<u64>;

    /// Returns the list elements between `start` and `stop` inclusive.
    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>>;

    /// Sets a TTL on `key`. Returns false if the key does not exist.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool>;

    /// Removes every key.
    async fn flush(&self) -> Result<()>;

    /// Round-trips to the store to check it is reachable.
    async fn ping(&self) -> Result<()>;
}
