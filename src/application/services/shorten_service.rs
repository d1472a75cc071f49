//! URL shortening orchestration: validation, identifier generation,
//! persistence and the reverse lookup path.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::generator::IdGenerator;
use crate::error::AppError;
use crate::infrastructure::store::KeyValueStore;
use crate::utils::url_validator::UrlValidator;

/// Key prefix namespacing short-URL mappings in the store.
pub const URL_KEY_PREFIX: &str = "url:";

fn mapping_key(identifier: &str) -> String {
    format!("{URL_KEY_PREFIX}{identifier}")
}

/// Result of a successful shorten request.
#[derive(Debug, Clone)]
pub struct ShortenedUrl {
    pub identifier: String,
    pub short_url: String,
}

/// Creates and resolves short URL mappings.
pub struct ShortenService {
    store: Arc<dyn KeyValueStore>,
    generator: IdGenerator,
    validator: UrlValidator,
    base_url: String,
    default_ttl: Option<Duration>,
}

impl ShortenService {
    /// Creates the service.
    ///
    /// `default_ttl` applies when a shorten request carries no explicit TTL;
    /// `None` stores mappings without expiry.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        generator: IdGenerator,
        validator: UrlValidator,
        base_url: String,
        default_ttl: Option<Duration>,
    ) -> Self {
        Self {
            store,
            generator,
            validator,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_ttl,
        }
    }

    /// Shortens a URL: validate, generate a free identifier, persist the
    /// mapping with its effective TTL, and compose the public short URL.
    ///
    /// An explicit `ttl` overrides the configured default; an explicit zero
    /// duration stores the mapping without expiry. The existence check
    /// distinguishes a definitive not-found from a transport error - a
    /// failed lookup aborts the shorten rather than risking a claim on an
    /// identifier that merely failed a transient check.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a rejected URL
    /// - [`AppError::GenerationExhausted`] when the retry budget runs out
    /// - [`AppError::Store`] on transport failure
    pub async fn shorten(
        &self,
        original_url: &str,
        ttl: Option<Duration>,
    ) -> Result<ShortenedUrl, AppError> {
        self.validator.validate(original_url)?;

        let effective_ttl = match ttl {
            Some(ttl) if ttl.is_zero() => None,
            Some(ttl) => Some(ttl),
            None => self.default_ttl,
        };

        let store = &self.store;
        let identifier = self
            .generator
            .generate_unique(|candidate| {
                let store = Arc::clone(store);
                async move { Ok(store.get(&mapping_key(&candidate)).await?.is_some()) }
            })
            .await?;

        self.store
            .set_with_expiry(&mapping_key(&identifier), original_url, effective_ttl)
            .await?;

        let short_url = format!("{}/{}", self.base_url, identifier);
        Ok(ShortenedUrl {
            identifier,
            short_url,
        })
    }

    /// Looks up the original URL behind an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown or expired identifier,
    /// [`AppError::Store`] on transport failure.
    pub async fn resolve(&self, identifier: &str) -> Result<String, AppError> {
        self.store
            .get(&mapping_key(identifier))
            .await?
            .ok_or_else(|| AppError::not_found("Short URL not found"))
    }
}
