//! Redis-backed key-value store implementation.

use super::service::{KeyValueStore, StoreCommand, StoreError, StoreReply, StoreResult};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::info;

/// Redis implementation of [`KeyValueStore`].
///
/// Uses `ConnectionManager` for connection reuse and automatic reconnection.
/// Batched submissions map onto a Redis pipeline, so a whole batch costs one
/// round trip.
pub struct RedisStore {
    client: ConnectionManager,
}

impl RedisStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the URL is invalid, the
    /// connection cannot be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> StoreResult<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            StoreError::Connection(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| StoreError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self { client: manager })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.client.clone();
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| StoreError::Operation(format!("GET {} failed: {}", key, e)))
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> StoreResult<()> {
        let mut conn = self.client.clone();
        let result = match ttl {
            Some(ttl) if !ttl.is_zero() => {
                conn.pset_ex::<_, _, ()>(key, value, ttl.as_millis() as u64)
                    .await
            }
            _ => conn.set::<_, _, ()>(key, value).await,
        };

        result.map_err(|e| StoreError::Operation(format!("SET {} failed: {}", key, e)))
    }

    async fn pipeline(&self, commands: Vec<StoreCommand>) -> StoreResult<Vec<StoreReply>> {
        let mut pipe = redis::pipe();
        for command in &commands {
            match command {
                StoreCommand::Get { key } => {
                    pipe.get(key);
                }
                StoreCommand::Set { key, value } => {
                    pipe.set(key, value);
                }
                StoreCommand::SetIfAbsent { key, value } => {
                    pipe.set_nx(key, value);
                }
                StoreCommand::Increment { key } => {
                    pipe.incr(key, 1);
                }
                StoreCommand::AddToSet { key, member } => {
                    pipe.sadd(key, member);
                }
                StoreCommand::SetCardinality { key } => {
                    pipe.scard(key);
                }
            }
        }

        let mut conn = self.client.clone();
        let raw: Vec<redis::Value> = pipe
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::Operation(format!("pipeline of {} commands failed: {}", commands.len(), e)))?;

        if raw.len() != commands.len() {
            return Err(StoreError::UnexpectedReply(format!(
                "pipeline returned {} replies for {} commands",
                raw.len(),
                commands.len()
            )));
        }

        commands
            .iter()
            .zip(raw)
            .map(|(command, value)| decode_reply(command, value))
            .collect()
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.client.clone();
        conn.ping::<()>()
            .await
            .map_err(|e| StoreError::Operation(format!("PING failed: {}", e)))
    }
}

/// Converts a raw Redis reply into the [`StoreReply`] matching its command.
fn decode_reply(command: &StoreCommand, value: redis::Value) -> StoreResult<StoreReply> {
    let unexpected =
        |e: redis::RedisError| StoreError::UnexpectedReply(format!("{:?}: {}", command, e));

    match command {
        StoreCommand::Get { .. } => {
            let value: Option<String> = redis::from_redis_value(&value).map_err(unexpected)?;
            Ok(StoreReply::Value(value))
        }
        StoreCommand::Set { .. } => Ok(StoreReply::Done),
        StoreCommand::SetIfAbsent { .. } => {
            let written: i64 = redis::from_redis_value(&value).map_err(unexpected)?;
            Ok(StoreReply::WasSet(written == 1))
        }
        StoreCommand::Increment { .. } => {
            let new_value: i64 = redis::from_redis_value(&value).map_err(unexpected)?;
            Ok(StoreReply::Integer(new_value))
        }
        StoreCommand::AddToSet { .. } => {
            let added: i64 = redis::from_redis_value(&value).map_err(unexpected)?;
            Ok(StoreReply::WasAdded(added > 0))
        }
        StoreCommand::SetCardinality { .. } => {
            let count: i64 = redis::from_redis_value(&value).map_err(unexpected)?;
            Ok(StoreReply::Cardinality(count))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_get_reply_handles_missing_key() {
        let command = StoreCommand::Get { key: "k".into() };
        let reply = decode_reply(&command, redis::Value::Nil).unwrap();
        assert_eq!(reply, StoreReply::Value(None));
    }

    #[test]
    fn decode_setnx_reply_maps_integers_to_bool() {
        let command = StoreCommand::SetIfAbsent {
            key: "k".into(),
            value: "v".into(),
        };
        assert_eq!(
            decode_reply(&command, redis::Value::Int(1)).unwrap(),
            StoreReply::WasSet(true)
        );
        assert_eq!(
            decode_reply(&command, redis::Value::Int(0)).unwrap(),
            StoreReply::WasSet(false)
        );
    }

    #[test]
    fn decode_sadd_reply_reports_new_members() {
        let command = StoreCommand::AddToSet {
            key: "k".into(),
            member: "m".into(),
        };
        assert_eq!(
            decode_reply(&command, redis::Value::Int(1)).unwrap(),
            StoreReply::WasAdded(true)
        );
        assert_eq!(
            decode_reply(&command, redis::Value::Int(0)).unwrap(),
            StoreReply::WasAdded(false)
        );
    }
}
