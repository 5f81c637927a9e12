//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::infrastructure::store::KeyValueStore`] trait
//! and give HTTP handlers a small, typed API.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation, resolution and access counting
//! - [`services::rate_limit_service::RateLimitService`] - Per-client shorten quota

pub mod services;
