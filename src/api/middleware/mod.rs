//! HTTP middleware and request extractors.
//!
//! Provides client identification and request tracing.

pub mod client_ip;
pub mod tracing;

pub use client_ip::ClientIp;
