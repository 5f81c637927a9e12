//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entities::{Link, NewLink, QuotaStatus};
use crate::utils::url_normalizer::is_valid_url;

/// Request to shorten a URL.
///
/// A missing `url` deserializes as empty and fails validation with the same
/// "invalid URL" message as a malformed one.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// Target URL; the scheme may be omitted.
    #[serde(default)]
    #[validate(custom(function = "validate_target_url"))]
    pub url: String,

    /// Optional custom alias, used verbatim. Empty means "generate one".
    #[serde(default)]
    pub short: Option<String>,

    /// Optional lifetime in hours. Absent or `0` means 24 hours.
    #[serde(default)]
    #[validate(range(max = 87_600, message = "invalid expiry"))]
    pub expiry: Option<u64>,
}

impl From<ShortenRequest> for NewLink {
    fn from(request: ShortenRequest) -> Self {
        NewLink {
            url: request.url,
            custom_alias: request.short,
            expiry_hours: request.expiry,
        }
    }
}

fn validate_target_url(url: &str) -> Result<(), ValidationError> {
    if is_valid_url(url) {
        Ok(())
    } else {
        Err(ValidationError::new("url").with_message("invalid URL".into()))
    }
}

/// Response for a created short link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    /// Stored target, with scheme enforced.
    pub url: String,
    /// `<domain>/<alias>`.
    pub custom_short: String,
    /// Lifetime of the mapping in hours.
    pub expiry: u64,
    /// Shorten requests the client has left in the current window.
    pub rate_limit: i64,
    /// Whole minutes until the client's window resets.
    pub rate_limit_reset: u64,
}

impl ShortenResponse {
    pub fn new(link: Link, short_url: String, quota: QuotaStatus) -> Self {
        Self {
            url: link.url,
            custom_short: short_url,
            expiry: link.expiry_hours,
            rate_limit: quota.remaining,
            rate_limit_reset: quota.reset_minutes(),
        }
    }
}
