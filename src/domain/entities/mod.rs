//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`Link`] - A stored `alias -> url` mapping
//! - [`NewLink`] - A shorten request before an alias is chosen
//! - [`LinkDetails`] - Mapping plus TTL and access count, for operators
//! - [`QuotaStatus`] - Remaining quota of one client

pub mod link;
pub mod quota;

pub use link::{DEFAULT_EXPIRY_HOURS, Link, LinkDetails, NewLink, counter_key};
pub use quota::{QuotaStatus, RATE_LIMIT_WINDOW};
