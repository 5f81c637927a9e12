//! Link creation, resolution and access counting.

use std::sync::Arc;

use serde_json::json;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{Link, LinkDetails, NewLink, counter_key};
use crate::error::AppError;
use crate::infrastructure::store::KeyValueStore;
use crate::utils::code_generator::generate_alias;
use crate::utils::url_normalizer::{enforce_http, is_outside_domain};

/// Service for creating and resolving shortened links.
///
/// Mappings live in the links namespace, resolution counters in the
/// counters namespace. The service keeps no state of its own besides the
/// public domain it serves from.
pub struct LinkService {
    links: Arc<dyn KeyValueStore>,
    counters: Arc<dyn KeyValueStore>,
    domain: String,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `domain` is this service's public host (e.g. `s.example.com`); it is
    /// used for the self-link guard and to compose short URLs.
    pub fn new(
        links: Arc<dyn KeyValueStore>,
        counters: Arc<dyn KeyValueStore>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            links,
            counters,
            domain: domain.into(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Stores a new `alias -> url` mapping.
    ///
    /// `new_link.url` must already be syntactically valid; this method
    /// rejects links back to the service, adds a missing scheme, picks the
    /// alias and writes the mapping with its TTL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the URL points at this service's domain.
    ///
    /// Returns [`AppError::Conflict`] if a live mapping already uses the alias.
    /// Generated aliases are not retried on collision.
    ///
    /// Returns [`AppError::Internal`] if the store cannot be read or written.
    pub async fn create_link(&self, new_link: NewLink) -> Result<Link, AppError> {
        if !is_outside_domain(&new_link.url, &self.domain) {
            return Err(AppError::unavailable("invalid URL", json!({})));
        }

        let url = enforce_http(&new_link.url);

        let alias = match new_link.requested_alias() {
            Some(alias) => alias.to_string(),
            None => generate_alias(),
        };

        if self.links.get(&alias).await?.is_some() {
            return Err(AppError::conflict(
                "Short URL already exists",
                json!({ "short": alias }),
            ));
        }

        let link = Link::new(alias, url, new_link.resolved_expiry_hours());

        self.links
            .set_ex(&link.alias, &link.url, link.ttl())
            .await
            .map_err(|e| {
                error!("Failed to store {}: {}", link.alias, e);
                AppError::internal("unable to connect to the server", json!({}))
            })?;

        info!(
            alias = %link.alias,
            expiry_hours = link.expiry_hours,
            "Short link created"
        );
        metrics::counter!("links_created_total").increment(1);

        Ok(link)
    }

    /// Looks up the original URL behind `alias`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the alias is unknown or has expired.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn resolve(&self, alias: &str) -> Result<String, AppError> {
        match self.links.get(alias).await? {
            Some(url) => {
                metrics::counter!("links_resolved_total").increment(1);
                Ok(url)
            }
            None => {
                debug!("Unknown alias {}", alias);
                Err(AppError::not_found("Short URL not found", json!({})))
            }
        }
    }

    /// Bumps the resolution counter of `alias` in the background.
    ///
    /// Best-effort by contract: the increment runs on a spawned task, the
    /// caller never waits for it, and a failure is only logged. Dropping the
    /// returned handle detaches the task.
    pub fn record_access(&self, alias: &str) -> JoinHandle<()> {
        let counters = Arc::clone(&self.counters);
        let key = counter_key(alias);

        tokio::spawn(async move {
            match counters.incr(&key).await {
                Ok(count) => debug!("{} -> {}", key, count),
                Err(e) => warn!("Failed to record access for {}: {}", key, e),
            }
        })
    }

    /// Full short URL for an alias: `<domain>/<alias>`.
    pub fn short_url(&self, alias: &str) -> String {
        format!("{}/{}", self.domain, alias)
    }

    /// Collects the mapping, its remaining TTL and its access count.
    ///
    /// Returns `Ok(None)` when the alias is unknown or expired.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn details(&self, alias: &str) -> Result<Option<LinkDetails>, AppError> {
        let Some(url) = self.links.get(alias).await? else {
            return Ok(None);
        };

        let ttl = self.links.ttl(alias).await?;
        let access_count = self
            .counters
            .get(&counter_key(alias))
            .await?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0);

        Ok(Some(LinkDetails {
            alias: alias.to_string(),
            url,
            short_url: self.short_url(alias),
            ttl,
            access_count,
        }))
    }
}
