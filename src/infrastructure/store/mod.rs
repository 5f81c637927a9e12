//! Key-value store backing every piece of persistent state.
//!
//! Provides a [`KeyValueStore`] trait with two implementations:
//! - [`RedisStore`] - Production Redis-backed store, one per [`Namespace`]
//! - [`MemoryStore`] - In-process store with TTL support for tests and local runs

mod memory_store;
mod redis_store;
mod service;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
pub use service::{KeyValueStore, Namespace, StoreError, StoreResult};

#[cfg(test)]
pub use service::MockKeyValueStore;
