//! DTOs for the shorten endpoint.

use serde::{Deserialize, Serialize};
use serde_with::{DurationSeconds, serde_as};
use std::time::Duration;
use validator::Validate;

/// Request to shorten a URL.
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten.
    #[validate(length(min = 1, message = "URL cannot be empty"))]
    pub original: String,

    /// Optional mapping lifetime in seconds. Omitted means the configured
    /// default; zero stores the mapping without expiry.
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    #[serde(default)]
    pub ttl: Option<Duration>,
}

/// Response for a successful shorten request.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub original: String,
    pub shortened: String,
}
