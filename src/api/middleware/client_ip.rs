//! Client IP extraction for per-client quotas.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;

use crate::state::AppState;

/// Address of the client that sent the request.
///
/// With [`AppState::behind_proxy`] set, the first `X-Forwarded-For` entry
/// wins, then `X-Real-IP`. Otherwise, and as a fallback, the peer socket
/// address is used. Requests with no source at all map to `"unknown"`.
///
/// Forwarding headers are spoofable; only trust them behind a reverse proxy
/// that overwrites them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl FromRequestParts<AppState> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(ClientIp(client_ip(parts, state.behind_proxy)))
    }
}

fn client_ip(parts: &Parts, behind_proxy: bool) -> String {
    if behind_proxy {
        if let Some(ip) = forwarded_ip(parts) {
            return ip;
        }
    }

    match parts.extensions.get::<ConnectInfo<SocketAddr>>() {
        Some(ConnectInfo(addr)) => addr.ip().to_string(),
        None => "unknown".to_string(),
    }
}

fn forwarded_ip(parts: &Parts) -> Option<String> {
    let forwarded = parts
        .headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    if let Some(ip) = forwarded {
        return Some(ip.to_string());
    }

    parts
        .headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}
