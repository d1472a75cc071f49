//! In-process key-value store for tests and Redis-less development.

use super::service::{KeyValueStore, StoreCommand, StoreError, StoreReply, StoreResult};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

enum Stored {
    Scalar(String),
    Set(HashSet<String>),
}

struct Entry {
    value: Stored,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// A [`KeyValueStore`] backed by a locked `HashMap`.
///
/// Honors expiry by checking stored deadlines on access; expired entries are
/// dropped lazily. Batched submissions execute sequentially under one lock,
/// which also makes them atomic as a unit, a stronger guarantee than the
/// Redis implementation provides.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn apply(entries: &mut HashMap<String, Entry>, command: &StoreCommand) -> StoreResult<StoreReply> {
        let now = Instant::now();

        match command {
            StoreCommand::Get { key } => match live_entry(entries, key, now) {
                Some(Entry {
                    value: Stored::Scalar(value),
                    ..
                }) => Ok(StoreReply::Value(Some(value.clone()))),
                Some(_) => Err(wrong_type(key)),
                None => Ok(StoreReply::Value(None)),
            },
            StoreCommand::Set { key, value } => {
                entries.insert(
                    key.clone(),
                    Entry {
                        value: Stored::Scalar(value.clone()),
                        expires_at: None,
                    },
                );
                Ok(StoreReply::Done)
            }
            StoreCommand::SetIfAbsent { key, value } => {
                if live_entry(entries, key, now).is_some() {
                    Ok(StoreReply::WasSet(false))
                } else {
                    entries.insert(
                        key.clone(),
                        Entry {
                            value: Stored::Scalar(value.clone()),
                            expires_at: None,
                        },
                    );
                    Ok(StoreReply::WasSet(true))
                }
            }
            StoreCommand::Increment { key } => {
                let current = match live_entry(entries, key, now) {
                    Some(Entry {
                        value: Stored::Scalar(value),
                        ..
                    }) => value
                        .parse::<i64>()
                        .map_err(|_| StoreError::Operation(format!("{}: not an integer", key)))?,
                    Some(_) => return Err(wrong_type(key)),
                    None => 0,
                };
                let next = current + 1;
                entries.insert(
                    key.clone(),
                    Entry {
                        value: Stored::Scalar(next.to_string()),
                        expires_at: None,
                    },
                );
                Ok(StoreReply::Integer(next))
            }
            StoreCommand::AddToSet { key, member } => match live_entry(entries, key, now) {
                Some(Entry {
                    value: Stored::Set(members),
                    ..
                }) => Ok(StoreReply::WasAdded(members.insert(member.clone()))),
                Some(_) => Err(wrong_type(key)),
                None => {
                    let mut members = HashSet::new();
                    members.insert(member.clone());
                    entries.insert(
                        key.clone(),
                        Entry {
                            value: Stored::Set(members),
                            expires_at: None,
                        },
                    );
                    Ok(StoreReply::WasAdded(true))
                }
            },
            StoreCommand::SetCardinality { key } => match live_entry(entries, key, now) {
                Some(Entry {
                    value: Stored::Set(members),
                    ..
                }) => Ok(StoreReply::Cardinality(members.len() as i64)),
                Some(_) => Err(wrong_type(key)),
                None => Ok(StoreReply::Cardinality(0)),
            },
        }
    }
}

/// Looks up a key, dropping it first if its deadline has passed.
fn live_entry<'a>(
    entries: &'a mut HashMap<String, Entry>,
    key: &str,
    now: Instant,
) -> Option<&'a mut Entry> {
    if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
        entries.remove(key);
    }
    entries.get_mut(key)
}

fn wrong_type(key: &str) -> StoreError {
    StoreError::Operation(format!("{}: value has the wrong type", key))
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match MemoryStore::apply(&mut entries, &StoreCommand::Get { key: key.to_string() })? {
            StoreReply::Value(value) => Ok(value),
            reply => Err(StoreError::UnexpectedReply(format!("{:?}", reply))),
        }
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> StoreResult<()> {
        let expires_at = ttl
            .filter(|ttl| !ttl.is_zero())
            .map(|ttl| Instant::now() + ttl);

        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key.to_string(),
            Entry {
                value: Stored::Scalar(value.to_string()),
                expires_at,
            },
        );
        Ok(())
    }

    async fn pipeline(&self, commands: Vec<StoreCommand>) -> StoreResult<Vec<StoreReply>> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        commands
            .iter()
            .map(|command| MemoryStore::apply(&mut entries, command))
            .collect()
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
