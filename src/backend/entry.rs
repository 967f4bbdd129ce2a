//! Store Entry Module
//!
//! A single key in the memory backend: either a byte string or a list,
//! with an optional expiry.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Stored Data ==
/// The value types the memory backend understands.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredData {
    /// Plain string value (also used for integer counters)
    Bytes(Vec<u8>),
    /// Ordered list built by `rpush`
    List(Vec<Vec<u8>>),
}

impl StoredData {
    /// Redis-style type name, used in wrong-type errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            StoredData::Bytes(_) => "string",
            StoredData::List(_) => "list",
        }
    }
}

// == Store Entry ==
/// Represents a single key with its data and expiry metadata.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// The stored data
    pub data: StoredData,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl StoreEntry {
    // == Constructor ==
    /// Creates a new entry without expiry.
    pub fn new(data: StoredData) -> Self {
        Self {
            data,
            expires_at: None,
        }
    }

    // == Expire ==
    /// Sets the expiry to `ttl` from now, replacing any previous one.
    pub fn expire_in(&mut self, ttl: Duration) {
        self.expires_at = Some(current_timestamp_ms() + ttl.as_millis() as u64);
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its expiration
    /// time, so a zero TTL expires immediately.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
