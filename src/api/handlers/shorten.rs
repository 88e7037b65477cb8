//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{ShortenBody, ShortenQuery, ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Allocates a slug for a target URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request
///
/// The target may be given as a query parameter or as a JSON body; the query
/// parameter wins when both are present.
///
/// ```text
/// POST /shorten?target_url=https://example.com
/// ```
///
/// ```json
/// { "target_url": "https://example.com" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "short_url": "/aZ3kP9" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if `target_url` is missing, too long, or contains
/// control characters.
/// Returns 500 if no unique slug could be allocated, 503 if the store is down.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Query(query): Query<ShortenQuery>,
    body: Option<Json<ShortenBody>>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let target_url = query
        .target_url
        .or_else(|| body.and_then(|Json(body)| body.target_url))
        .ok_or_else(|| {
            AppError::bad_request("target_url is required", json!({ "field": "target_url" }))
        })?;

    let request = ShortenRequest { target_url };
    request.validate()?;

    let record = state
        .allocation_service
        .allocate(request.target_url)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse::for_slug(&record.slug)),
    ))
}
