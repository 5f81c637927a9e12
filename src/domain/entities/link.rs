//! Link entity representing a shortened URL mapping.

use std::time::Duration;

/// Lifetime of a mapping when the request does not ask for one.
pub const DEFAULT_EXPIRY_HOURS: u64 = 24;

const SECONDS_PER_HOUR: u64 = 3600;

/// A stored `alias -> url` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub alias: String,
    pub url: String,
    pub expiry_hours: u64,
}

impl Link {
    pub fn new(alias: String, url: String, expiry_hours: u64) -> Self {
        Self {
            alias,
            url,
            expiry_hours,
        }
    }

    /// Time-to-live the mapping is stored with.
    pub fn ttl(&self) -> Duration {
        hours(self.expiry_hours)
    }
}

/// Input data for creating a new link.
///
/// `url` is taken as submitted; normalization happens in
/// [`crate::application::services::LinkService::create_link`].
#[derive(Debug, Clone, Default)]
pub struct NewLink {
    pub url: String,
    pub custom_alias: Option<String>,
    pub expiry_hours: Option<u64>,
}

impl NewLink {
    /// The caller's alias, if one was given. An empty string counts as none.
    pub fn requested_alias(&self) -> Option<&str> {
        self.custom_alias.as_deref().filter(|alias| !alias.is_empty())
    }

    /// Requested lifetime in hours; zero or absent means the default.
    pub fn resolved_expiry_hours(&self) -> u64 {
        match self.expiry_hours {
            None | Some(0) => DEFAULT_EXPIRY_HOURS,
            Some(hours) => hours,
        }
    }
}

/// Everything known about an alias, for operators.
#[derive(Debug, Clone)]
pub struct LinkDetails {
    pub alias: String,
    pub url: String,
    pub short_url: String,
    pub ttl: Option<Duration>,
    pub access_count: i64,
}

/// Store key of the resolution counter for `alias`.
pub fn counter_key(alias: &str) -> String {
    format!("{}:count", alias)
}

fn hours(count: u64) -> Duration {
    Duration::from_secs(count.saturating_mul(SECONDS_PER_HOUR))
}
