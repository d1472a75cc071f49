//! HTTP server initialization and runtime setup.
//!
//! Handles store connection, worker spawning, and Axum server lifecycle.

use crate::application::services::{AnalyticsService, ShortenService};
use crate::config::Config;
use crate::domain::access_worker::run_access_worker;
use crate::domain::generator::IdGenerator;
use crate::domain::rate_limiter::{RateLimiter, run_bucket_sweeper};
use crate::infrastructure::store::{KeyValueStore, RedisStore};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::url_validator::UrlValidator;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Redis connection
/// - Per-client rate limiter and its idle-bucket sweeper
/// - Background access worker
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Store connection fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store: Arc<dyn KeyValueStore> = Arc::new(RedisStore::connect(&config.redis_url).await?);
    tracing::info!("Connected to store");

    let limiter = Arc::new(RateLimiter::new(
        config.rate_limit_per_second,
        config.rate_limit_burst,
    ));
    tokio::spawn(run_bucket_sweeper(
        Arc::clone(&limiter),
        Duration::from_secs(config.rate_limit_sweep_seconds),
    ));
    tracing::info!("Bucket sweeper started");

    let analytics = Arc::new(AnalyticsService::new(Arc::clone(&store)));

    let (access_tx, access_rx) = mpsc::channel(config.access_queue_capacity);
    tokio::spawn(run_access_worker(access_rx, Arc::clone(&analytics)));
    tracing::info!("Access worker started");

    let validator = UrlValidator::with_blocked_domains(config.blocked_domains.clone());
    let shortener = Arc::new(ShortenService::new(
        Arc::clone(&store),
        IdGenerator::new(),
        validator,
        config.base_url.clone(),
        config.default_ttl(),
    ));

    let state = AppState::new(
        shortener,
        analytics,
        limiter,
        store,
        access_tx,
        config.behind_proxy,
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await?;

    Ok(())
}
