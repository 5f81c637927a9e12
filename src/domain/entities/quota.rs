//! Per-client request quota.

use std::time::Duration;

/// How long a rate-limit record lives after it is created.
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(30 * 60);

/// Remaining quota of one client and when it resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaStatus {
    pub remaining: i64,
    pub reset_in: Option<Duration>,
}

impl QuotaStatus {
    /// Time to reset in whole minutes, rounded down.
    pub fn reset_minutes(&self) -> u64 {
        self.reset_in.map_or(0, |ttl| ttl.as_secs() / 60)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining <= 0
    }
}
