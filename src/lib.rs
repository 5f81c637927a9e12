//! # shortify
//!
//! A small URL shortening service built with Axum and Redis.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Links, quotas and their invariants
//! - **Application Layer** ([`application`]) - Link and rate-limit services
//! - **Infrastructure Layer** ([`infrastructure`]) - Key-value store trait, Redis and in-memory stores
//! - **API Layer** ([`api`]) - Handlers, DTOs and middleware
//!
//! ## Endpoints
//!
//! - `POST /api/v1` - Shorten a URL, subject to a per-client quota
//! - `GET /{alias}` - 301 redirect to the original URL
//!
//! ## Quick Start
//!
//! ```bash
//! export DOMAIN="s.example.com"
//! export DB_ADDR="localhost:6379"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LinkService, RateLimitService};
    pub use crate::domain::entities::{Link, LinkDetails, NewLink, QuotaStatus};
    pub use crate::error::AppError;
    pub use crate::infrastructure::store::{KeyValueStore, MemoryStore, Namespace, RedisStore};
    pub use crate::state::AppState;
}
