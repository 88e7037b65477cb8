//! Repository trait for URL record storage.

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::errors::StoreError;
use async_trait::async_trait;

/// Durable slug-keyed storage for URL records.
///
/// This is the only shared mutable state in the service. Every mutation goes
/// through [`insert`](Self::insert) or [`increment_clicks`](Self::increment_clicks),
/// and each backend must make both atomic:
///
/// - `insert` checks for an existing slug and writes the record as one step,
///   so two writers racing on the same candidate cannot both succeed.
/// - `increment_clicks` is an in-store atomic add, never a read followed by a
///   write of the read value plus one.
///
/// Operations on different slugs never wait on each other.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgRecordStore`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryRecordStore`] - in-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns whether a record with this slug exists.
    ///
    /// Advisory only: a `false` answer does not reserve the slug.
    async fn exists(&self, slug: &str) -> Result<bool, StoreError>;

    /// Inserts a new record with `clicks = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateSlug`] if the slug is already taken.
    /// Nothing is written in that case.
    async fn insert(&self, record: NewUrlRecord) -> Result<UrlRecord, StoreError>;

    /// Fetches the record for a slug.
    async fn get(&self, slug: &str) -> Result<Option<UrlRecord>, StoreError>;

    /// Atomically adds one to the record's click counter.
    ///
    /// Returns the counter value after the increment.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record has this slug.
    async fn increment_clicks(&self, slug: &str) -> Result<i64, StoreError>;

    /// Counts stored records.
    async fn count(&self) -> Result<i64, StoreError>;
}
