//! # urlshort
//!
//! A URL shortening service built with Axum and Redis.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Identifier generation, rate limiting,
//!   access events and the background access worker
//! - **Application Layer** ([`application`]) - Shortening and analytics services
//! - **Infrastructure Layer** ([`infrastructure`]) - Key-value store backends
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Collision-checked random identifiers over a configurable alphabet
//! - Per-client token-bucket rate limiting with idle-bucket eviction
//! - Pipelined access analytics (clicks, first/last access, unique visitors)
//! - Optional per-mapping TTL with a configurable default
//!
//! ## Quick Start
//!
//! ```bash
//! # Set required environment variables
//! export REDIS_URL="redis://localhost:6379/0"
//! export BASE_URL="https://sho.rt"
//!
//! # Start the service
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{AnalyticsService, AnalyticsSummary, ShortenService};
    pub use crate::domain::generator::IdGenerator;
    pub use crate::domain::rate_limiter::RateLimiter;
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
