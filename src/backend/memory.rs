//! Memory Backend Module
//!
//! In-process key-value store with Redis command semantics: string values,
//! integer counters, lists and millisecond TTLs. Expired keys are dropped
//! lazily on access and in bulk by the purge task.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::backend::{KeyValueBackend, StoreEntry, StoredData};
use crate::error::{CacheError, Result};

// == Memory Store ==
/// Synchronous key-value storage behind the memory backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, StoreEntry>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops `key` if it has expired.
    fn purge_if_expired(&mut self, key: &str) {
        if self.entries.get(key).is_some_and(StoreEntry::is_expired) {
            self.entries.remove(key);
        }
    }

    /// Live entry for `key`.
    fn live(&mut self, key: &str) -> Option<&mut StoreEntry> {
        self.purge_if_expired(key);
        self.entries.get_mut(key)
    }

    /// Live entry for `key`, inserting `empty` if it is absent.
    fn live_or_insert(&mut self, key: &str, empty: StoredData) -> &mut StoreEntry {
        self.purge_if_expired(key);
        self.entries
            .entry(key.to_string())
            .or_insert_with(|| StoreEntry::new(empty))
    }

    // == Set ==
    /// Stores a byte value, overwriting any previous value and TTL.
    pub fn set(&mut self, key: &str, value: Vec<u8>) {
        self.entries
            .insert(key.to_string(), StoreEntry::new(StoredData::Bytes(value)));
    }

    // == Get ==
    /// Retrieves a byte value. Lists are a wrong-type error.
    pub fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.live(key) {
            None => Ok(None),
            Some(entry) => match &entry.data {
                StoredData::Bytes(value) => Ok(Some(value.clone())),
                other => Err(wrong_type(key, other)),
            },
        }
    }

    // == Incr ==
    /// Increments an integer counter, creating it at 0 first if absent.
    ///
    /// An existing TTL is kept.
    pub fn incr(&mut self, key: &str) -> Result<i64> {
        let entry = self.live_or_insert(key, StoredData::Bytes(b"0".to_vec()));
        let value = match &mut entry.data {
            StoredData::Bytes(value) => value,
            other => return Err(wrong_type(key, other)),
        };

        let current: i64 = std::str::from_utf8(value)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                CacheError::Backend("value is not an integer or out of range".to_string())
            })?;
        let next = current
            .checked_add(1)
            .ok_or_else(|| CacheError::Backend("increment would overflow".to_string()))?;

        *value = next.to_string().into_bytes();
        Ok(next)
    }

    // == Rpush ==
    /// Appends to a list, creating it if absent.
    pub fn rpush(&mut self, key: &str, item: Vec<u8>) -> Result<u64> {
        let entry = self.live_or_insert(key, StoredData::List(Vec::new()));
        match &mut entry.data {
            StoredData::List(items) => {
                items.push(item);
                Ok(items.len() as u64)
            }
            other => Err(wrong_type(key, other)),
        }
    }

    // == Lrange ==
    /// Returns list elements in `[start, stop]`, Redis index rules.
    pub fn lrange(&mut self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        let items = match self.live(key) {
            None => return Ok(Vec::new()),
            Some(entry) => match &entry.data {
                StoredData::List(items) => items,
                other => return Err(wrong_type(key, other)),
            },
        };

        Ok(match list_bounds(items.len(), start, stop) {
            Some((from, to)) => items[from..=to].to_vec(),
            None => Vec::new(),
        })
    }

    // == Expire ==
    /// Sets a TTL on an existing key.
    pub fn expire(&mut self, key: &str, ttl: Duration) -> bool {
        match self.live(key) {
            Some(entry) => {
                entry.expire_in(ttl);
                true
            }
            None => false,
        }
    }

    // == Flush ==
    /// Removes every key.
    pub fn flush(&mut self) {
        self.entries.clear();
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        before - self.entries.len()
    }

    // == Length ==
    /// Returns the current number of keys, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn wrong_type(key: &str, found: &StoredData) -> CacheError {
    CacheError::Backend(format!(
        "WRONGTYPE key '{}' holds a {} value",
        key,
        found.type_name()
    ))
}

/// Converts Redis-style inclusive, possibly negative bounds to slice indices.
fn list_bounds(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = len as i64;
    if len == 0 {
        return None;
    }

    let start = if start < 0 { (start + len).max(0) } else { start };
    let stop = if stop < 0 { stop + len } else { stop.min(len - 1) };

    if start > stop || start >= len {
        None
    } else {
        Some((start as usize, stop as usize))
    }
}

// == Memory Backend ==
/// Cloneable async handle over a shared [`MemoryStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryBackend {
    /// Creates a backend over an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops expired keys, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }

    /// Number of keys currently held.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Returns true if no keys are held.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueBackend for MemoryBackend {
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.store.write().await.set(key, value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.store.write().await.get(key)
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        self.store.write().await.incr(key)
    }

    async fn rpush(&self, key: &str, item: Vec<u8>) -> Result<u64> {
        self.store.write().await.rpush(key, item)
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        self.store.write().await.lrange(key, start, stop)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        Ok(self.store.write().await.expire(key, ttl))
    }

    async fn flush(&self) -> Result<()> {
        let mut store = self.store.write().await;
        debug!("Flushing {} keys from memory backend", store.len());
        store.flush();
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
