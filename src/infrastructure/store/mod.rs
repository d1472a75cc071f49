//! Key-value store boundary.
//!
//! Defines the [`KeyValueStore`] trait together with its batched command
//! protocol, and provides two implementations:
//! - [`RedisStore`] - production Redis-backed store
//! - [`MemoryStore`] - in-process store for tests and local development

mod memory_store;
mod redis_store;
mod service;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
pub use service::{KeyValueStore, StoreCommand, StoreError, StoreReply, StoreResult};

#[cfg(test)]
pub use service::MockKeyValueStore;
