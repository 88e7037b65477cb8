//! DTOs for the shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::utils::redirect_target::is_header_safe;

/// Upper bound on stored target length; larger bodies are almost always abuse.
pub const MAX_TARGET_URL_LENGTH: u64 = 8192;

/// `target_url` supplied as a query parameter (`POST /shorten?target_url=...`).
#[derive(Debug, Default, Deserialize)]
pub struct ShortenQuery {
    pub target_url: Option<String>,
}

/// `target_url` supplied as a JSON body.
#[derive(Debug, Default, Deserialize)]
pub struct ShortenBody {
    pub target_url: Option<String>,
}

/// A resolved shortening request.
///
/// The target is otherwise opaque: empty strings are accepted, and nothing
/// checks that it parses as a URL. The only constraint is that it must be
/// usable as a `Location` header value when the slug is later followed.
#[derive(Debug, Validate)]
pub struct ShortenRequest {
    #[validate(
        length(max = MAX_TARGET_URL_LENGTH, message = "target_url is too long"),
        custom(function = validate_header_safe)
    )]
    pub target_url: String,
}

/// Rejects characters that cannot appear in an HTTP header value.
fn validate_header_safe(value: &str) -> Result<(), ValidationError> {
    if !is_header_safe(value) {
        let mut err = ValidationError::new("header_safe");
        err.message = Some("target_url must not contain control characters".into());
        return Err(err);
    }

    Ok(())
}

/// Response for a created short link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    /// Path of the short link, relative to the service root (`/<slug>`).
    pub short_url: String,
}

impl ShortenResponse {
    pub fn for_slug(slug: &str) -> Self {
        Self {
            short_url: format!("/{slug}"),
        }
    }
}
