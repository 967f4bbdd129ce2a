//! Redis Backend Module
//!
//! Talks to a Redis server over a multiplexed tokio connection.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::info;

use crate::backend::KeyValueBackend;
use crate::error::{CacheError, Result};

// == Redis Backend ==
/// Redis-backed store. Cloning shares the underlying connection.
#[derive(Clone)]
pub struct RedisBackend {
    conn: MultiplexedConnection,
}

impl RedisBackend {
    // == Connect ==
    /// Opens a multiplexed connection to the server at `url`.
    ///
    /// Fails with `StoreUnavailable` if the URL is malformed or the server
    /// cannot be reached.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| CacheError::StoreUnavailable(format!("{}: {}", url, e)))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::StoreUnavailable(format!("{}: {}", url, e)))?;

        info!("Connected to Redis at {}", url);
        Ok(Self { conn })
    }

    fn conn(&self) -> MultiplexedConnection {
        self.conn.clone()
    }
}

#[async_trait]
impl KeyValueBackend for RedisBackend {
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let _: () = self.conn().set(key, value).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.conn().get(key).await?)
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        Ok(self.conn().incr(key, 1i64).await?)
    }

    async fn rpush(&self, key: &str, item: Vec<u8>) -> Result<u64> {
        Ok(self.conn().rpush(key, item).await?)
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        Ok(self
            .conn()
            .lrange(key, start as isize, stop as isize)
            .await?)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.conn();
        let updated: bool = redis::cmd("PEXPIRE")
            .arg(key)
            .arg(ttl.as_millis() as u64)
            .query_async(&mut conn)
            .await?;
        Ok(updated)
    }

    async fn flush(&self) -> Result<()> {
        let mut conn = self.conn();
        let _: () = redis::cmd("FLUSHDB").query_async(&mut conn).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
