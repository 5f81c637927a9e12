//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::middleware::ClientIp;
use crate::domain::entities::NewLink;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for one URL.
///
/// # Endpoint
///
/// `POST /api/v1`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "short": "promo",   // optional custom alias
///   "expiry": 48        // optional, hours; 0 or absent means 24
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "custom_short": "s.example.com/promo",
///   "expiry": 48,
///   "rate_limit": 9,
///   "rate_limit_reset": 29
/// }
/// ```
///
/// # Request Flow
///
/// 1. Parse the body
/// 2. Admit the client against its quota
/// 3. Validate the URL
/// 4. Store the mapping
/// 5. Charge the client's quota and report what is left
///
/// Once the mapping is stored the request succeeds; a failure to charge the
/// quota is only logged.
///
/// The quota is checked before the URL is validated, so malformed requests
/// still need an open quota but do not use it up.
///
/// # Errors
///
/// - 400 Bad Request: body is not valid JSON of the expected shape, or the URL is invalid
/// - 503 Service Unavailable: quota exhausted (`rate_limit_reset` in minutes) or the
///   URL points back at this service
/// - 409 Conflict: the alias is taken by a live mapping
/// - 500 Internal Server Error: store failure before the mapping is written
pub async fn shorten_handler(
    State(state): State<AppState>,
    ClientIp(client): ClientIp,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(request) = payload?;

    let admitted = state.rate_limit_service.check(&client).await?;

    request.validate()?;

    let link = state
        .link_service
        .create_link(NewLink::from(request))
        .await?;

    let quota = state.rate_limit_service.consume(&client, admitted).await;
    let short_url = state.link_service.short_url(&link.alias);

    Ok(Json(ShortenResponse::new(link, short_url, quota)))
}
