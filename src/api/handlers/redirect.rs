//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::slug_generator::is_valid_slug;

/// Redirects a slug to its target URL.
///
/// # Endpoint
///
/// `GET /{slug}`
///
/// # Request Flow
///
/// 1. Reject slugs that could never have been allocated (no store access)
/// 2. Resolve the record and count the click
/// 3. Return 307 Temporary Redirect
///
/// The click is committed before the redirect is sent, so a client that
/// follows up with `GET /stats/{slug}` always sees its own visit.
///
/// # Errors
///
/// Returns 404 Not Found if the slug doesn't exist.
pub async fn redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    if !is_valid_slug(&slug) {
        return Err(AppError::not_found(
            "Slug not found",
            json!({ "slug": slug }),
        ));
    }

    let target_url = state.redirect_service.redirect(&slug).await?;

    let location = HeaderValue::from_bytes(target_url.as_bytes()).map_err(|_| {
        AppError::internal(
            "Stored target cannot be used as a redirect location",
            json!({ "slug": slug }),
        )
    })?;

    Ok((
        StatusCode::TEMPORARY_REDIRECT,
        [(header::LOCATION, location)],
    )
        .into_response())
}
