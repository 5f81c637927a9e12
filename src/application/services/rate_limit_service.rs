//! Per-client shorten quota backed by the counters namespace.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{QuotaStatus, RATE_LIMIT_WINDOW};
use crate::error::AppError;
use crate::infrastructure::store::{KeyValueStore, StoreResult};

/// Tracks how many shorten requests each client has left.
///
/// A client's record is created with the full quota on its first request
/// and lives for [`RATE_LIMIT_WINDOW`]; once it expires the next request
/// starts over.
///
/// [`check`](Self::check) and [`consume`](Self::consume) are separate store
/// round trips, so concurrent requests from one client may all pass the
/// check before any of them decrements. The remaining count can therefore
/// drop below zero.
pub struct RateLimitService {
    counters: Arc<dyn KeyValueStore>,
    quota: i64,
    window: Duration,
}

impl RateLimitService {
    pub fn new(counters: Arc<dyn KeyValueStore>, quota: i64) -> Self {
        Self {
            counters,
            quota,
            window: RATE_LIMIT_WINDOW,
        }
    }

    pub fn quota(&self) -> i64 {
        self.quota
    }

    /// Admits or rejects a request from `client`.
    ///
    /// A client without a record gets one holding the full quota. A stored
    /// value that does not parse as an integer counts as exhausted. On
    /// admission, returns the quota as it stood before this request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] with `rate_limit_reset` (whole
    /// minutes until the record expires) when no quota is left.
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn check(&self, client: &str) -> Result<QuotaStatus, AppError> {
        let Some(raw) = self.counters.get(client).await? else {
            self.counters
                .set_ex(client, &self.quota.to_string(), self.window)
                .await?;
            debug!("Opened quota window for {} ({})", client, self.quota);
            return Ok(QuotaStatus {
                remaining: self.quota,
                reset_in: Some(self.window),
            });
        };

        let remaining = raw.parse::<i64>().unwrap_or_else(|_| {
            warn!("Unreadable quota for {}: {:?}", client, raw);
            0
        });

        if remaining > 0 {
            return Ok(QuotaStatus {
                remaining,
                reset_in: None,
            });
        }

        let reset_in = self.counters.ttl(client).await.unwrap_or_else(|e| {
            warn!("Failed to read quota TTL for {}: {}", client, e);
            None
        });
        let status = QuotaStatus {
            remaining,
            reset_in,
        };

        info!(client, reset_minutes = status.reset_minutes(), "Rate limit exceeded");
        metrics::counter!("rate_limited_total").increment(1);

        Err(AppError::unavailable(
            "Rate Limit Exceeded",
            json!({ "rate_limit_reset": status.reset_minutes() }),
        ))
    }

    /// Takes one request off `client`'s quota and reports what is left.
    ///
    /// `admitted` is what [`check`](Self::check) returned for this request.
    /// Runs after the link is stored, so it never fails the request: on a
    /// store error it logs and reports `admitted` minus one with no known
    /// reset time.
    ///
    /// If the record expired since [`check`](Self::check), the decrement
    /// starts a fresh window instead of leaving a record without TTL.
    pub async fn consume(&self, client: &str, admitted: QuotaStatus) -> QuotaStatus {
        match self.decrement(client).await {
            Ok(status) => status,
            Err(e) => {
                warn!("Failed to charge quota for {}: {}", client, e);
                QuotaStatus {
                    remaining: admitted.remaining - 1,
                    reset_in: admitted.reset_in,
                }
            }
        }
    }

    async fn decrement(&self, client: &str) -> StoreResult<QuotaStatus> {
        let mut remaining = self.counters.decr(client).await?;
        let mut reset_in = self.counters.ttl(client).await?;

        if reset_in.is_none() {
            remaining = self.quota - 1;
            self.counters
                .set_ex(client, &remaining.to_string(), self.window)
                .await?;
            reset_in = Some(self.window);
        }

        Ok(QuotaStatus {
            remaining,
            reset_in,
        })
    }

    /// Current quota of `client`, or `None` if it has no open window.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn status(&self, client: &str) -> Result<Option<QuotaStatus>, AppError> {
        let Some(raw) = self.counters.get(client).await? else {
            return Ok(None);
        };

        Ok(Some(QuotaStatus {
            remaining: raw.parse().unwrap_or(0),
            reset_in: self.counters.ttl(client).await?,
        }))
    }
}
