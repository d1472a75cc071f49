//! Submitted-URL validation.

use std::collections::HashSet;

use url::Url;

use crate::error::AppError;

/// Standard maximum URL length.
pub const MAX_URL_LENGTH: usize = 2048;

/// Validates URLs submitted for shortening.
///
/// A pure predicate: checks emptiness, length, syntactic well-formedness,
/// scheme, and membership of the hostname in a blocked-domain set.
#[derive(Debug, Default, Clone)]
pub struct UrlValidator {
    blocked_domains: HashSet<String>,
}

impl UrlValidator {
    /// Creates a validator with an empty blocklist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator seeded with blocked domains.
    pub fn with_blocked_domains<I>(domains: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            blocked_domains: domains
                .into_iter()
                .map(|d| d.trim().to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    /// Adds a domain to the blocklist.
    pub fn add_blocked_domain(&mut self, domain: &str) {
        self.blocked_domains.insert(domain.to_ascii_lowercase());
    }

    /// Checks the validity of a URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when the URL is empty, too long,
    /// malformed, uses a scheme other than http/https, lacks a host, or
    /// points at a blocked domain.
    pub fn validate(&self, raw_url: &str) -> Result<(), AppError> {
        if raw_url.is_empty() {
            return Err(AppError::bad_request(
                "URL cannot be empty",
                Some("Please provide a valid URL".to_string()),
            ));
        }

        if raw_url.len() > MAX_URL_LENGTH {
            return Err(AppError::bad_request(
                "URL is too long",
                Some(format!("Maximum allowed length is {MAX_URL_LENGTH} characters")),
            ));
        }

        let parsed = Url::parse(raw_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", Some(e.to_string()))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::bad_request(
                "Only http and https schemes are supported",
                Some("Please enter a URL starting with http or https".to_string()),
            ));
        }

        let host = parsed.host_str().ok_or_else(|| {
            AppError::bad_request("URL must include a host", None)
        })?;

        if self.blocked_domains.contains(&host.to_ascii_lowercase()) {
            return Err(AppError::bad_request(
                "This domain is blocked",
                Some("The specified domain is not allowed".to_string()),
            ));
        }

        Ok(())
    }
}
