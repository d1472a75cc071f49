//! Key-value store trait and the batched command protocol.

use async_trait::async_trait;
use std::time::Duration;

/// Errors that can occur during store operations.
///
/// A `Get` on a missing key is not an error; it returns `Ok(None)`. Errors
/// here always describe a transport- or protocol-level failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store connection error: {0}")]
    Connection(String),

    #[error("store operation failed: {0}")]
    Operation(String),

    #[error("unexpected reply from store: {0}")]
    UnexpectedReply(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A single command inside a batched submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCommand {
    /// Read a scalar value.
    Get { key: String },
    /// Overwrite a scalar value unconditionally.
    Set { key: String, value: String },
    /// Write a scalar value only if the key does not exist yet.
    SetIfAbsent { key: String, value: String },
    /// Atomically increment an integer value by one, creating it at zero.
    Increment { key: String },
    /// Add a member to a set.
    AddToSet { key: String, member: String },
    /// Count the members of a set.
    SetCardinality { key: String },
}

/// Per-command reply from a batched submission, in command order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreReply {
    /// Reply to [`StoreCommand::Get`]; `None` when the key is absent.
    Value(Option<String>),
    /// Reply to [`StoreCommand::Set`].
    Done,
    /// Reply to [`StoreCommand::SetIfAbsent`]; `true` when the write happened.
    WasSet(bool),
    /// Reply to [`StoreCommand::Increment`], carrying the new value.
    Integer(i64),
    /// Reply to [`StoreCommand::AddToSet`]; `true` when the member was new.
    WasAdded(bool),
    /// Reply to [`StoreCommand::SetCardinality`].
    Cardinality(i64),
}

/// Durable string-to-string mapping with expiry, counters and sets.
///
/// Implementations must be thread-safe. Every call may block on network I/O;
/// no ordering is guaranteed between concurrent callers beyond what the
/// backend itself provides.
///
/// # Implementations
///
/// - [`crate::infrastructure::store::RedisStore`] - Redis-backed store
/// - [`crate::infrastructure::store::MemoryStore`] - in-process store for
///   tests and Redis-less development
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a scalar value.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the key does not exist or has expired. A definitive
    /// not-found is never reported as an error; `Err` always means the
    /// lookup itself failed.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes a scalar value, optionally bounded by a time-to-live.
    ///
    /// `ttl = None` stores the value without expiry.
    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> StoreResult<()>;

    /// Submits several commands in one round trip.
    ///
    /// Replies come back in command order and are inspected independently;
    /// the batch is not atomic as a unit. A transport failure fails the
    /// whole call.
    async fn pipeline(&self, commands: Vec<StoreCommand>) -> StoreResult<Vec<StoreReply>>;

    /// Verifies the backend is reachable.
    async fn ping(&self) -> StoreResult<()>;
}
