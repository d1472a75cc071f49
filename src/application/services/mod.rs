//! Service layer orchestrating domain logic over the store boundary.

mod analytics_service;
mod shorten_service;

pub use analytics_service::{AnalyticsService, AnalyticsSummary};
pub use shorten_service::{ShortenService, ShortenedUrl, URL_KEY_PREFIX};
