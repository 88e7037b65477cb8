//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten`      - Allocate a slug (rate limited per client IP)
//! - `GET  /stats/{slug}` - Click statistics
//! - `GET  /health`       - Health check
//! - `GET  /{slug}`       - Redirect
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on `POST /shorten`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let shorten = if behind_proxy {
        api::routes::shorten_routes().layer(rate_limit::proxied_layer())
    } else {
        api::routes::shorten_routes().layer(rate_limit::layer())
    };

    let router = Router::new()
        .merge(shorten)
        .merge(base_routes())
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

/// Every route without rate limiting or middleware, still awaiting state.
///
/// Integration tests drive this directly since the rate limiter needs a real
/// socket peer address.
pub fn unthrottled_routes() -> Router<AppState> {
    Router::new()
        .merge(api::routes::shorten_routes())
        .merge(base_routes())
}

fn base_routes() -> Router<AppState> {
    api::routes::public_routes().route("/health", get(health_handler))
}
