//! Redis-backed store implementation.

use super::service::{KeyValueStore, Namespace, StoreError, StoreResult};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

/// Redis store bound to a single logical database.
///
/// Uses `ConnectionManager` for connection reuse and transparent reconnects.
/// Unlike a cache, failures here are real failures: they propagate to the
/// caller as [`StoreError`].
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    namespace: Namespace,
}

impl RedisStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// `redis_url` must already select the database of `namespace`
    /// (see [`crate::config::Config::redis_url`]).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the URL is invalid, the connection cannot
    /// be established, or the PING fails.
    pub async fn connect(redis_url: &str, namespace: Namespace) -> StoreResult<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            StoreError::Connection(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            StoreError::Connection(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| StoreError::Connection(format!("Redis PING failed: {}", e)))?;

        info!(
            "✓ Connected to Redis ({:?}, db {})",
            namespace,
            namespace.index()
        );

        Ok(Self {
            conn: manager,
            namespace,
        })
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value = conn.get::<_, Option<String>>(key).await?;
        debug!(
            namespace = ?self.namespace,
            "GET {} -> {}",
            key,
            if value.is_some() { "hit" } else { "miss" }
        );
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs()).await?;
        debug!(namespace = ?self.namespace, "SET {} (TTL: {}s)", key, ttl.as_secs());
        Ok(())
    }

    async fn incr(&self, key: &str) -> StoreResult<i64> {
        let mut conn = self.conn.clone();
        Ok(conn.incr::<_, _, i64>(key, 1).await?)
    }

    async fn decr(&self, key: &str) -> StoreResult<i64> {
        let mut conn = self.conn.clone();
        Ok(conn.decr::<_, _, i64>(key, 1).await?)
    }

    async fn ttl(&self, key: &str) -> StoreResult<Option<Duration>> {
        let mut conn = self.conn.clone();
        // -2: missing key, -1: no expiry
        let seconds = conn.ttl::<_, i64>(key).await?;
        Ok(u64::try_from(seconds).ok().map(Duration::from_secs))
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await?;
        Ok(())
    }
}
