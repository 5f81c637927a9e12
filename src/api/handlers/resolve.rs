//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use tracing::error;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects an alias to its original URL.
///
/// # Endpoint
///
/// `GET /{alias}`
///
/// # Request Flow
///
/// 1. Look up the mapping
/// 2. Bump the alias's access counter on a background task
/// 3. Return 301 Moved Permanently
///
/// The counter update is fire-and-forget: the redirect neither waits for it
/// nor fails when it does.
///
/// # Errors
///
/// Returns 404 Not Found if the alias is unknown or expired.
/// Returns 500 Internal Server Error on store failures.
pub async fn resolve_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let url = state.link_service.resolve(&alias).await?;

    drop(state.link_service.record_access(&alias));

    let location = HeaderValue::try_from(url).map_err(|e| {
        error!("Stored URL for {} is not a valid header: {}", alias, e);
        AppError::internal("Internal Server Error", json!({}))
    })?;

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]))
}
