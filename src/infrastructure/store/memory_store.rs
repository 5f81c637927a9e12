//! In-process store implementation.

use super::service::{KeyValueStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// A store that keeps everything in a process-local map.
///
/// Mirrors the Redis semantics the service relies on: expired keys read as
/// missing, `INCR`/`DECR` create missing keys from zero and keep an existing
/// TTL. Expiry follows the tokio clock, so tests can move time with
/// `tokio::time::advance`.
///
/// # Use Cases
///
/// - Handler and service tests
/// - Local runs without a Redis server
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        entries.values().filter(|e| e.is_live(now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn add(&self, key: &str, delta: i64) -> StoreResult<i64> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        let entry = entries
            .get(key)
            .filter(|e| e.is_live(now))
            .cloned()
            .unwrap_or(Entry {
                value: "0".to_string(),
                expires_at: None,
            });

        let current: i64 = entry
            .value
            .parse()
            .map_err(|_| StoreError::NotAnInteger(key.to_string()))?;
        let next = current
            .checked_add(delta)
            .ok_or_else(|| StoreError::Operation(format!("Overflow at key '{}'", key)))?;

        entries.insert(
            key.to_string(),
            Entry {
                value: next.to_string(),
                expires_at: entry.expires_at,
            },
        );

        Ok(next)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| StoreError::Operation(format!("invalid expire time for '{}'", key)))?;

        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(expires_at),
            },
        );
        Ok(())
    }

    async fn incr(&self, key: &str) -> StoreResult<i64> {
        self.add(key, 1).await
    }

    async fn decr(&self, key: &str) -> StoreResult<i64> {
        self.add(key, -1).await
    }

    async fn ttl(&self, key: &str) -> StoreResult<Option<Duration>> {
        let now = Instant::now();
        let entries = self.entries.lock().await;

        Ok(entries
            .get(key)
            .filter(|e| e.is_live(now))
            .and_then(|e| e.expires_at)
            .map(|at| at.saturating_duration_since(now)))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
