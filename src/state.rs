//! Shared application state injected into handlers and middleware.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{AnalyticsService, ShortenService};
use crate::domain::access_event::AccessEvent;
use crate::domain::rate_limiter::RateLimiter;
use crate::infrastructure::store::KeyValueStore;

#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortenService>,
    pub analytics: Arc<AnalyticsService>,
    pub limiter: Arc<RateLimiter>,
    pub store: Arc<dyn KeyValueStore>,
    pub access_tx: mpsc::Sender<AccessEvent>,
    /// When true, the client key is read from `X-Forwarded-For` / `X-Real-IP`
    /// headers. Enable only behind a trusted reverse proxy.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(
        shortener: Arc<ShortenService>,
        analytics: Arc<AnalyticsService>,
        limiter: Arc<RateLimiter>,
        store: Arc<dyn KeyValueStore>,
        access_tx: mpsc::Sender<AccessEvent>,
        behind_proxy: bool,
    ) -> Self {
        Self {
            shortener,
            analytics,
            limiter,
            store,
            access_tx,
            behind_proxy,
        }
    }
}
