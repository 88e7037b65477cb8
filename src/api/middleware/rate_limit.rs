//! Rate limiting middleware using token bucket algorithm.
//!
//! Only slug allocation is limited: it is the one endpoint that writes, and
//! an unthrottled client could otherwise fill the store.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Sustained allocations per second per client.
const PER_SECOND: u64 = 5;

/// Allocations a client may burst before being throttled.
const BURST_SIZE: u32 = 50;

/// Creates a rate limiter keyed on the socket peer address.
///
/// Requests exceeding the limit receive `429 Too Many Requests`. Requires the
/// server to be started with connect info (`into_make_service_with_connect_info`).
pub fn layer() -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(PER_SECOND)
            .burst_size(BURST_SIZE)
            .finish()
            .expect("rate limit constants are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

/// Creates a rate limiter keyed on the forwarded client address.
///
/// Reads `X-Forwarded-For`, `X-Real-IP` and `Forwarded` before falling back to
/// the peer address. Use only behind a trusted reverse proxy; otherwise
/// clients can pick their own key.
pub fn proxied_layer()
-> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .per_second(PER_SECOND)
            .burst_size(BURST_SIZE)
            .finish()
            .expect("rate limit constants are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}
