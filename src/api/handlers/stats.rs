//! Handler for link statistics.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::slug_generator::is_valid_slug;

/// Returns click statistics for a slug.
///
/// # Endpoint
///
/// `GET /stats/{slug}`
///
/// # Response
///
/// ```json
/// {
///   "target_url": "https://example.com",
///   "clicks": 1,
///   "created_at": "2025-01-01T12:00:00.123456Z"
/// }
/// ```
///
/// Reading stats never changes them.
///
/// # Errors
///
/// Returns 404 Not Found if the slug doesn't exist.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    if !is_valid_slug(&slug) {
        return Err(AppError::not_found(
            "Slug not found",
            json!({ "slug": slug }),
        ));
    }

    let stats = state.stats_service.stats(&slug).await?;

    Ok(Json(stats.into()))
}
