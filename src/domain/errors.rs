//! Errors raised by the record store.
//!
//! These are the persistence-level failures every [`RecordStore`] backend
//! speaks. Services translate them into [`crate::error::AppError`]; only
//! [`StoreError::DuplicateSlug`] is ever recovered locally (by the allocator).
//!
//! [`RecordStore`]: crate::domain::repositories::RecordStore

use thiserror::Error;

/// Failure of a single record store operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The slug is already taken by another record.
    #[error("slug `{0}` already exists")]
    DuplicateSlug(String),

    /// No record exists for the slug.
    #[error("slug `{0}` not found")]
    NotFound(String),

    /// The backend could not be reached (pool exhausted, connection lost, I/O).
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with an error that is not a connectivity problem.
    #[error("record store error: {0}")]
    Backend(String),
}
