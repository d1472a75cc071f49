//! Access analytics aggregation over the key-value store.
//!
//! Each identifier owns four independently addressed fields: a click
//! counter, write-once first-access and overwritten last-access timestamps,
//! and the set of distinct client keys seen. Unique visitors are always
//! derived from the set's cardinality; there is no separate counter that
//! could drift from it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::infrastructure::store::{KeyValueStore, StoreCommand, StoreReply};

fn total_clicks_key(identifier: &str) -> String {
    format!("analytics:{identifier}:total_clicks")
}

fn first_accessed_key(identifier: &str) -> String {
    format!("analytics:{identifier}:first_accessed")
}

fn last_accessed_key(identifier: &str) -> String {
    format!("analytics:{identifier}:last_accessed")
}

fn unique_ips_key(identifier: &str) -> String {
    format!("analytics:{identifier}:unique_ips")
}

/// Point-in-time analytics snapshot for one identifier.
///
/// Timestamps are `None` for an identifier that has never been accessed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_clicks: i64,
    pub first_accessed: Option<DateTime<Utc>>,
    pub last_accessed: Option<DateTime<Utc>>,
    pub unique_visits: i64,
}

/// Records accesses and reconstructs analytics snapshots.
pub struct AnalyticsService {
    store: Arc<dyn KeyValueStore>,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Records one access: bump the click counter, stamp first/last access,
    /// and add the client to the unique-visitor set.
    ///
    /// All four writes go out as one batched submission, so recording costs
    /// a single round trip. The batch is not atomic as a unit; a connection
    /// drop mid-batch can leave some fields updated and others not, which is
    /// accepted for a best-effort metric.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] on transport failure.
    pub async fn record_access(&self, identifier: &str, client_key: &str) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();

        self.store
            .pipeline(vec![
                StoreCommand::Increment {
                    key: total_clicks_key(identifier),
                },
                StoreCommand::SetIfAbsent {
                    key: first_accessed_key(identifier),
                    value: now.clone(),
                },
                StoreCommand::Set {
                    key: last_accessed_key(identifier),
                    value: now,
                },
                StoreCommand::AddToSet {
                    key: unique_ips_key(identifier),
                    member: client_key.to_string(),
                },
            ])
            .await?;

        Ok(())
    }

    /// Reads all analytics fields for an identifier in one batched round trip.
    ///
    /// Absent or unparsable fields degrade to their zero values rather than
    /// failing the snapshot, so a never-accessed identifier yields zero
    /// clicks and no timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] on transport failure only.
    pub async fn get_analytics(&self, identifier: &str) -> Result<AnalyticsSummary, AppError> {
        let replies = self
            .store
            .pipeline(vec![
                StoreCommand::Get {
                    key: total_clicks_key(identifier),
                },
                StoreCommand::Get {
                    key: first_accessed_key(identifier),
                },
                StoreCommand::Get {
                    key: last_accessed_key(identifier),
                },
                StoreCommand::SetCardinality {
                    key: unique_ips_key(identifier),
                },
            ])
            .await?;

        let total_clicks = match replies.first() {
            Some(StoreReply::Value(Some(value))) => value.parse().unwrap_or(0),
            _ => 0,
        };
        let unique_visits = match replies.get(3) {
            Some(StoreReply::Cardinality(count)) => *count,
            _ => 0,
        };

        Ok(AnalyticsSummary {
            total_clicks,
            first_accessed: parse_timestamp(replies.get(1)),
            last_accessed: parse_timestamp(replies.get(2)),
            unique_visits,
        })
    }
}

fn parse_timestamp(reply: Option<&StoreReply>) -> Option<DateTime<Utc>> {
    match reply {
        Some(StoreReply::Value(Some(value))) => DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        _ => None,
    }
}
