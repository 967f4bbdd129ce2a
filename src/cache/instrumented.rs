//! Instrumented Cache Module
//!
//! Stores values under fresh random keys. Every `store` call is counted and
//! its argument and returned key are kept in the call history.

use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::SharedBackend;
use crate::cache::{CallRecorder, Payload, Replay};
use crate::error::{CacheError, Result};

/// Operation name `store` is counted and recorded under.
pub const STORE_OPERATION: &str = "Cache.store";

// == Instrumented Cache ==
/// Key-value cache with call counting and replayable history for `store`.
///
/// Reads are not instrumented.
pub struct InstrumentedCache {
    backend: SharedBackend,
    recorder: CallRecorder,
}

impl InstrumentedCache {
    // == Initialize ==
    /// Takes ownership of a backend handle and flushes it.
    ///
    /// All previous keys, counters and history are destroyed so the cache
    /// starts from a clean namespace.
    pub async fn initialize(backend: SharedBackend) -> Result<Self> {
        backend.ping().await?;
        backend.flush().await?;
        info!("Cache initialized, backing store flushed");

        Ok(Self {
            recorder: CallRecorder::new(backend.clone()),
            backend,
        })
    }

    // == Store ==
    /// Stores `value` under a new UUIDv4 key and returns the key.
    pub async fn store(&self, value: impl Into<Payload>) -> Result<String> {
        let value = value.into();
        let inputs = [value.to_string()];
        let backend = &self.backend;
        let bytes = value.to_bytes();

        self.recorder
            .record(STORE_OPERATION, &inputs, || async move {
                let key = Uuid::new_v4().to_string();
                backend.set(&key, bytes).await?;
                debug!("Stored value under {}", key);
                Ok(key)
            })
            .await
    }

    // == Get ==
    /// Raw bytes stored under `key`, `None` if never stored.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.backend.get(key).await
    }

    /// Reads `key` and converts the raw bytes with `decode`.
    pub async fn get_with<T, F>(&self, key: &str, decode: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> Result<T>,
    {
        self.get(key).await?.map(decode).transpose()
    }

    /// Reads `key` as UTF-8 text.
    pub async fn get_as_text(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, decode_text).await
    }

    /// Reads `key` as a base-10 integer.
    pub async fn get_as_integer(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, decode_integer).await
    }

    /// Reads `key` as a floating-point number.
    pub async fn get_as_float(&self, key: &str) -> Result<Option<f64>> {
        self.get_with(key, decode_float).await
    }

    // == Replay ==
    /// Call history of `operation`. Unknown operations report zero calls.
    pub async fn replay(&self, operation: &str) -> Result<Replay> {
        self.recorder.replay(operation).await
    }

    /// Number of recorded calls to `operation`.
    pub async fn call_count(&self, operation: &str) -> Result<u64> {
        self.recorder.call_count(operation).await
    }
}

// == Decoders ==
/// UTF-8 decode.
pub fn decode_text(raw: Vec<u8>) -> Result<String> {
    String::from_utf8(raw).map_err(|e| CacheError::Decode(format!("invalid UTF-8: {}", e)))
}

/// Base-10 integer parse.
pub fn decode_integer(raw: Vec<u8>) -> Result<i64> {
    let text = decode_text(raw)?;
    text.parse()
        .map_err(|_| CacheError::Decode(format!("'{}' is not an integer", text)))
}

/// Decimal float parse.
pub fn decode_float(raw: Vec<u8>) -> Result<f64> {
    let text = decode_text(raw)?;
    text.parse()
        .map_err(|_| CacheError::Decode(format!("'{}' is not a number", text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{KeyValueBackend, MemoryBackend};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    /// Backend whose server is gone: every command fails.
    struct UnreachableBackend;

    #[async_trait]
    impl KeyValueBackend for UnreachableBackend {
        async fn set(&self, _key: &str, _value: Vec<u8>) -> Result<()> {
            Err(down())
        }

        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Err(down())
        }

        async fn incr(&self, _key: &str) -> Result<i64> {
            Err(down())
        }

        async fn rpush(&self, _key: &str, _item: Vec<u8>) -> Result<u64> {
            Err(down())
        }

        async fn lrange(&self, _key: &str, _start: i64, _stop: i64) -> Result<Vec<Vec<u8>>> {
            Err(down())
        }

        async fn expire(&self, _key: &str, _ttl: Duration) -> Result<bool> {
            Err(down())
        }

        async fn flush(&self) -> Result<()> {
            Err(down())
        }

        async fn ping(&self) -> Result<()> {
            Err(down())
        }
    }

    fn down() -> CacheError {
        CacheError::StoreUnavailable("connection refused".to_string())
    }

    async fn cache() -> (InstrumentedCache, MemoryBackend) {
        let backend = MemoryBackend::new();
        let cache = InstrumentedCache::initialize(Arc::new(backend.clone()))
            .await
            .unwrap();
        (cache, backend)
    }

    #[tokio::test]
    async fn test_store_and_get_text() {
        let (cache, _) = cache().await;

        let key = cache.store("foo").await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(b"foo".to_vec()));
        assert_eq!(cache.get_as_text(&key).await.unwrap(), Some("foo".into()));
    }

    #[tokio::test]
    async fn test_store_and_get_integer() {
        let (cache, _) = cache().await;

        let key = cache.store(123).await.unwrap();
        assert_eq!(cache.get_as_integer(&key).await.unwrap(), Some(123));
    }

    #[tokio::test]
    async fn test_store_bytes_and_float() {
        let (cache, _) = cache().await;

        let bytes_key = cache.store(b"hello".to_vec()).await.unwrap();
        assert_eq!(
            cache.get(&bytes_key).await.unwrap(),
            Some(b"hello".to_vec())
        );

        let float_key = cache.store(2.25).await.unwrap();
        assert_eq!(cache.get_as_float(&float_key).await.unwrap(), Some(2.25));
    }

    #[tokio::test]
    async fn test_get_with_custom_decoder() {
        let (cache, _) = cache().await;

        let key = cache.store("bar").await.unwrap();
        let len = cache
            .get_with(&key, |raw| Ok(raw.len()))
            .await
            .unwrap();
        assert_eq!(len, Some(3));
    }

    #[tokio::test]
    async fn test_get_unknown_key_is_absent() {
        let (cache, _) = cache().await;

        assert_eq!(cache.get("never-stored").await.unwrap(), None);
        assert_eq!(cache.get_as_text("never-stored").await.unwrap(), None);
        assert_eq!(cache.get_as_integer("never-stored").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_as_integer_decode_error() {
        let (cache, _) = cache().await;

        let key = cache.store("twelve").await.unwrap();
        assert!(matches!(
            cache.get_as_integer(&key).await,
            Err(CacheError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_get_as_text_invalid_utf8() {
        let (cache, _) = cache().await;

        let key = cache.store(vec![0xffu8, 0xfe]).await.unwrap();
        assert!(matches!(
            cache.get_as_text(&key).await,
            Err(CacheError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_keys_are_unique() {
        let (cache, _) = cache().await;

        let k1 = cache.store("same").await.unwrap();
        let k2 = cache.store("same").await.unwrap();
        assert_ne!(k1, k2);
        assert!(Uuid::parse_str(&k1).is_ok());
    }

    #[tokio::test]
    async fn test_store_is_counted_and_recorded() {
        let (cache, _) = cache().await;

        let k1 = cache.store("foo").await.unwrap();
        let k2 = cache.store(b"bar".to_vec()).await.unwrap();
        let k3 = cache.store(42).await.unwrap();

        assert_eq!(cache.call_count(STORE_OPERATION).await.unwrap(), 3);

        let replay = cache.replay(STORE_OPERATION).await.unwrap();
        assert_eq!(replay.calls, 3);
        let inputs: Vec<_> = replay.entries.iter().map(|e| e.input.as_str()).collect();
        let outputs: Vec<_> = replay.entries.iter().map(|e| e.output.clone()).collect();
        assert_eq!(inputs, vec!["foo", "b'bar'", "42"]);
        assert_eq!(outputs, vec![k1.clone(), k2, k3]);

        let transcript = replay.to_string();
        assert!(transcript.starts_with("Cache.store was called 3 times:"));
        assert!(transcript.contains(&format!("Cache.store(*(foo,)) -> {}", k1)));
    }

    #[tokio::test]
    async fn test_get_is_not_instrumented() {
        let (cache, _) = cache().await;

        let key = cache.store("foo").await.unwrap();
        cache.get(&key).await.unwrap();
        cache.get_as_text(&key).await.unwrap();

        assert_eq!(cache.call_count(STORE_OPERATION).await.unwrap(), 1);
        assert_eq!(cache.call_count("Cache.get").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_initialize_flushes_store() {
        let backend = MemoryBackend::new();
        backend.set("stale", b"data".to_vec()).await.unwrap();

        let cache = InstrumentedCache::initialize(Arc::new(backend.clone()))
            .await
            .unwrap();
        assert!(backend.is_empty().await);

        cache.store("foo").await.unwrap();

        let cache = InstrumentedCache::initialize(Arc::new(backend.clone()))
            .await
            .unwrap();
        assert!(backend.is_empty().await);
        assert_eq!(cache.call_count(STORE_OPERATION).await.unwrap(), 0);

        InstrumentedCache::initialize(Arc::new(backend.clone()))
            .await
            .unwrap();
        assert!(backend.is_empty().await);
    }

    #[tokio::test]
    async fn test_concurrent_stores_keep_history_paired() {
        let (cache, _) = cache().await;
        let cache = Arc::new(cache);

        let mut handles = Vec::new();
        for i in 0..20i64 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                let key = cache.store(i).await.unwrap();
                (i, key)
            }));
        }

        let mut expected = std::collections::HashMap::new();
        for handle in handles {
            let (i, key) = handle.await.unwrap();
            expected.insert(key, i.to_string());
        }

        let replay = cache.replay(STORE_OPERATION).await.unwrap();
        assert_eq!(replay.calls, 20);
        assert_eq!(replay.entries.len(), 20);
        for entry in &replay.entries {
            assert_eq!(expected.get(&entry.output), Some(&entry.input));
        }
    }

    #[tokio::test]
    async fn test_initialize_unreachable_store() {
        let result = InstrumentedCache::initialize(Arc::new(UnreachableBackend)).await;
        assert!(matches!(result, Err(CacheError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_replay_is_safe_for_any_name() {
        let (cache, _) = cache().await;

        let key = cache.store(7).await.unwrap();
        let inputs_list = format!("{}:inputs", STORE_OPERATION);

        for name in [key.as_str(), inputs_list.as_str()] {
            let replay = cache.replay(name).await.unwrap();
            assert_eq!(replay.calls, 0, "{} should report no activity", name);
            assert!(replay.entries.is_empty());
        }

        assert_eq!(cache.replay(STORE_OPERATION).await.unwrap().calls, 1);
    }
}
