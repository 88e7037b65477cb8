//! API route configuration.

use crate::api::handlers::{redirect_handler, shorten_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Slug allocation route. Rate limited by the top-level router.
///
/// - `POST /shorten` - Allocate a slug for a target URL
pub fn shorten_routes() -> Router<AppState> {
    Router::new().route("/shorten", post(shorten_handler))
}

/// Read routes.
///
/// - `GET /stats/{slug}` - Click statistics for a slug
/// - `GET /{slug}`       - Redirect to the slug's target, counting the click
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/stats/{slug}", get(stats_handler))
        .route("/{slug}", get(redirect_handler))
}
