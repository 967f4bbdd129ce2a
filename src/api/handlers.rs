//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::backend::SharedBackend;
use crate::cache::InstrumentedCache;
use crate::error::{CacheError, Result};
use crate::models::{
    Decode, GetQuery, GetResponse, HealthResponse, PageCountResponse, PageQuery, PageResponse,
    ReplayResponse, StoreRequest, StoreResponse,
};
use crate::pages::{PageFetcher, PageTracker};

/// Application state shared across all handlers.
///
/// Holds the instrumented cache and the page tracker, both built over the
/// same backend connection.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<InstrumentedCache>,
    pub pages: Arc<PageTracker>,
}

impl AppState {
    /// Creates a new AppState from an initialized cache and a tracker.
    pub fn new(cache: InstrumentedCache, pages: PageTracker) -> Self {
        Self {
            cache: Arc::new(cache),
            pages: Arc::new(pages),
        }
    }

    /// Initializes the cache over `backend` (flushing it) and builds a
    /// tracker over the same backend.
    pub async fn initialize(
        backend: SharedBackend,
        fetcher: Arc<dyn PageFetcher>,
        config: &crate::config::Config,
    ) -> Result<Self> {
        let cache = InstrumentedCache::initialize(backend.clone()).await?;
        let pages = PageTracker::with_ttl(
            backend,
            fetcher,
            std::time::Duration::from_secs(config.page_count_ttl),
        );
        Ok(Self::new(cache, pages))
    }
}

/// Handler for POST /store
///
/// Stores a value under a freshly generated key and returns the key.
pub async fn store_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> Result<Json<StoreResponse>> {
    let key = state.cache.store(req.value).await?;

    Ok(Json(StoreResponse::new(key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value by key, decoded as `?decode=raw|text|integer|float`.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<GetQuery>,
) -> Result<Json<GetResponse>> {
    let cache = &state.cache;
    let value: Option<Value> = match query.decode {
        Decode::Raw => cache.get(&key).await?.map(Value::from),
        Decode::Text => cache.get_as_text(&key).await?.map(Value::from),
        Decode::Integer => cache.get_as_integer(&key).await?.map(Value::from),
        Decode::Float => cache.get_as_float(&key).await?.map(Value::from),
    };

    let value = value.ok_or_else(|| CacheError::NotFound(key.clone()))?;
    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for GET /replay/:operation
///
/// Returns the recorded call history of an operation.
pub async fn replay_handler(
    State(state): State<AppState>,
    Path(operation): Path<String>,
) -> Result<Json<ReplayResponse>> {
    let replay = state.cache.replay(&operation).await?;

    Ok(Json(ReplayResponse::from(replay)))
}

/// Handler for GET /page?url=...
///
/// Fetches a page and counts the access.
pub async fn page_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let content = state.pages.tracked_fetch(&query.url).await?;
    let access_count = state.pages.access_count(&query.url).await?;

    Ok(Json(PageResponse {
        url: query.url,
        access_count,
        content,
    }))
}

/// Handler for GET /page/count?url=...
///
/// Returns the access counter of a URL without fetching it.
pub async fn page_count_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageCountResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let access_count = state.pages.access_count(&query.url).await?;

    Ok(Json(PageCountResponse {
        url: query.url,
        access_count,
    }))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
