//! Shared application state passed to every handler.

use std::sync::Arc;

use crate::application::services::{LinkService, RateLimitService};

/// Application state, cloned into each request.
///
/// Holds only `Arc`s, so cloning is cheap and handlers share one set of
/// services and store connections.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub rate_limit_service: Arc<RateLimitService>,
    /// Read the client IP from forwarding headers instead of the peer address.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService>,
        rate_limit_service: Arc<RateLimitService>,
        behind_proxy: bool,
    ) -> Self {
        Self {
            link_service,
            rate_limit_service,
            behind_proxy,
        }
    }
}
