//! Background worker draining the access-event queue into analytics.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::AnalyticsService;
use crate::domain::access_event::AccessEvent;

/// Consumes access events and records them against the store.
///
/// Failures are logged with the identifier for context and never retried;
/// a lost event costs one click in a best-effort metric. The loop ends when
/// every sender has been dropped.
pub async fn run_access_worker(
    mut rx: mpsc::Receiver<AccessEvent>,
    analytics: Arc<AnalyticsService>,
) {
    while let Some(event) = rx.recv().await {
        if let Err(e) = analytics
            .record_access(&event.identifier, &event.client_key)
            .await
        {
            tracing::warn!(
                identifier = %event.identifier,
                error = %e,
                "failed to record access analytics"
            );
        }
    }

    tracing::debug!("access worker stopped: event channel closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::store::MemoryStore;

    #[tokio::test]
    async fn worker_drains_queue_into_analytics() {
        let store = Arc::new(MemoryStore::new());
        let analytics = Arc::new(AnalyticsService::new(store));
        let (tx, rx) = mpsc::channel(16);

        let worker = tokio::spawn(run_access_worker(rx, Arc::clone(&analytics)));

        tx.send(AccessEvent::new("abc12345", "10.0.0.1"))
            .await
            .unwrap();
        tx.send(AccessEvent::new("abc12345", "10.0.0.2"))
            .await
            .unwrap();
        drop(tx);
        worker.await.unwrap();

        let summary = analytics.get_analytics("abc12345").await.unwrap();
        assert_eq!(summary.total_clicks, 2);
        assert_eq!(summary.unique_visits, 2);
    }
}
