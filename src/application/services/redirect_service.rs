//! Redirect resolution with click accounting.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::repositories::RecordStore;
use crate::error::AppError;
use crate::utils::redirect_target::is_header_safe;

/// Service that resolves slugs to targets and counts the visit.
pub struct RedirectService<S: RecordStore + ?Sized = dyn RecordStore> {
    store: Arc<S>,
}

impl<S: RecordStore + ?Sized> RedirectService<S> {
    /// Creates a new redirect service.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Resolves `slug` to its target URL, counting one click.
    ///
    /// The click is committed by the store before this returns `Ok`; a
    /// failed increment fails the whole redirect, so every successful
    /// redirect is counted exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this slug. Nothing is
    /// created or counted in that case.
    ///
    /// Returns [`AppError::Internal`] without counting if the stored target
    /// cannot be sent as a `Location` header.
    ///
    /// Returns [`AppError::Unavailable`] if the store cannot be reached.
    pub async fn redirect(&self, slug: &str) -> Result<String, AppError> {
        let Some(record) = self.store.get(slug).await? else {
            metrics::counter!("redirects_not_found_total").increment(1);
            return Err(AppError::not_found(
                "Slug not found",
                json!({ "slug": slug }),
            ));
        };

        if !is_header_safe(&record.target_url) {
            warn!(%slug, "stored target is not a valid redirect location");
            return Err(AppError::internal(
                "Stored target cannot be used as a redirect location",
                json!({ "slug": slug }),
            ));
        }

        let clicks = self.store.increment_clicks(slug).await?;

        debug!(%slug, clicks, "redirect counted");
        metrics::counter!("redirects_total").increment(1);

        Ok(record.target_url)
    }
}
