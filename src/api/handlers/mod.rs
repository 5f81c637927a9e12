//! HTTP request handlers for API endpoints.

pub mod resolve;
pub mod shorten;

pub use resolve::resolve_handler;
pub use shorten::shorten_handler;
