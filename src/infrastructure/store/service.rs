//! Store trait, namespaces and error types.

use async_trait::async_trait;
use std::time::Duration;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store connection error: {0}")]
    Connection(String),

    #[error("Store operation error: {0}")]
    Operation(String),

    #[error("Value at key '{0}' is not an integer")]
    NotAnInteger(String),
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        Self::Operation(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Logical partition of the store.
///
/// Maps onto a Redis database index. Link mappings live apart from
/// counters and rate-limit records so their key spaces never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// `alias -> original URL`, each entry with its own TTL.
    Links,
    /// `ip -> remaining quota` and `alias:count -> resolutions`.
    Counters,
}

impl Namespace {
    /// Redis database index for this namespace.
    pub fn index(self) -> u8 {
        match self {
            Self::Links => 0,
            Self::Counters => 1,
        }
    }
}

/// Single-key operations the service needs from its store.
///
/// Every operation is atomic per key; callers rely on that and take no
/// locks of their own.
///
/// # Implementations
///
/// - [`crate::infrastructure::store::RedisStore`] - Redis `GET`/`SET EX`/`INCR`/`DECR`/`TTL`
/// - [`crate::infrastructure::store::MemoryStore`] - in-process map with expiry
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value under `key`, or `None` when absent or expired.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value and TTL.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()>;

    /// Increments the integer under `key` by one and returns the new value.
    ///
    /// A missing key starts from zero and carries no TTL. An existing TTL
    /// is left untouched.
    async fn incr(&self, key: &str) -> StoreResult<i64>;

    /// Decrements the integer under `key` by one and returns the new value.
    ///
    /// Same key-creation and TTL rules as [`KeyValueStore::incr`].
    async fn decr(&self, key: &str) -> StoreResult<i64>;

    /// Remaining time-to-live of `key`.
    ///
    /// `None` when the key is missing or never expires.
    async fn ttl(&self, key: &str) -> StoreResult<Option<Duration>>;

    /// Round-trips to the backend.
    async fn ping(&self) -> StoreResult<()>;
}
