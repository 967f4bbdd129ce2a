//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::{CallEntry, Replay};

/// Response body for the STORE operation (POST /store)
#[derive(Debug, Clone, Serialize)]
pub struct StoreResponse {
    /// The generated key
    pub key: String,
}

impl StoreResponse {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value, decoded as requested
    pub value: Value,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for the replay endpoint (GET /replay/:operation)
#[derive(Debug, Clone, Serialize)]
pub struct ReplayResponse {
    pub operation: String,
    pub calls: u64,
    pub entries: Vec<CallEntry>,
    /// Human-readable transcript, one line per call
    pub transcript: String,
}

impl From<Replay> for ReplayResponse {
    fn from(replay: Replay) -> Self {
        let transcript = replay.to_string();
        Self {
            operation: replay.operation,
            calls: replay.calls,
            entries: replay.entries,
            transcript,
        }
    }
}

/// Response body for a tracked page fetch (GET /page)
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    pub url: String,
    /// Accesses in the current window, this one included
    pub access_count: u64,
    pub content: String,
}

/// Response body for the counter lookup (GET /page/count)
#[derive(Debug, Clone, Serialize)]
pub struct PageCountResponse {
    pub url: String,
    pub access_count: u64,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
