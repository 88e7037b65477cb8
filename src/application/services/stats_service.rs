//! Read-only record statistics.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::UrlStats;
use crate::domain::repositories::RecordStore;
use crate::error::AppError;

/// Service for reading a record's click statistics.
pub struct StatsService<S: RecordStore + ?Sized = dyn RecordStore> {
    store: Arc<S>,
}

impl<S: RecordStore + ?Sized> StatsService<S> {
    /// Creates a new statistics service.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the target, click count and creation time for `slug`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this slug.
    /// Returns [`AppError::Unavailable`] if the store cannot be reached.
    pub async fn stats(&self, slug: &str) -> Result<UrlStats, AppError> {
        self.store
            .get(slug)
            .await?
            .map(UrlStats::from)
            .ok_or_else(|| AppError::not_found("Slug not found", json!({ "slug": slug })))
    }
}
