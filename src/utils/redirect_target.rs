//! Checks on stored targets before they are sent back to clients.

/// Returns true if `target` can be sent as an HTTP header value.
///
/// Mirrors the rule of `http::HeaderValue::from_bytes`: any byte is allowed
/// except ASCII control characters other than horizontal tab.
pub fn is_header_safe(target: &str) -> bool {
    !target.bytes().any(|b| (b < 0x20 && b != b'\t') || b == 0x7f)
}
