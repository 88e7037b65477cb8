//! PostgreSQL implementation of the record store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::errors::StoreError;
use crate::domain::repositories::RecordStore;

/// Name of the unique constraint on `urls.slug` (see `migrations/`).
const SLUG_CONSTRAINT: &str = "urls_slug_key";

#[derive(sqlx::FromRow)]
struct UrlRow {
    id: i64,
    slug: String,
    target_url: String,
    created_at: DateTime<Utc>,
    clicks: i64,
}

impl From<UrlRow> for UrlRecord {
    fn from(r: UrlRow) -> Self {
        UrlRecord::new(r.id, r.slug, r.target_url, r.created_at, r.clicks)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(e.to_string()),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Returns true if the error is a unique violation on the slug constraint.
fn is_slug_violation(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    db_err.is_unique_violation() && db_err.constraint() == Some(SLUG_CONSTRAINT)
}

/// PostgreSQL repository for URL records.
///
/// Every operation is a single statement, so a cancelled request either
/// committed its statement or left no trace. `insert` relies on the
/// `urls_slug_key` constraint for uniqueness, and `increment_clicks` is an
/// in-place `clicks = clicks + 1` whose row lock serializes concurrent
/// redirects on the same slug.
pub struct PgRecordStore {
    pool: Arc<PgPool>,
}

impl PgRecordStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn exists(&self, slug: &str) -> Result<bool, StoreError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM urls WHERE slug = $1)")
                .bind(slug)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn insert(&self, record: NewUrlRecord) -> Result<UrlRecord, StoreError> {
        let result = sqlx::query_as::<_, UrlRow>(
            r#"
            INSERT INTO urls (slug, target_url, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT ON CONSTRAINT urls_slug_key DO NOTHING
            RETURNING id, slug, target_url, created_at, clicks
            "#,
        )
        .bind(&record.slug)
        .bind(&record.target_url)
        .bind(record.created_at)
        .fetch_optional(self.pool.as_ref())
        .await;

        match result {
            Ok(Some(row)) => Ok(row.into()),
            Ok(None) => Err(StoreError::DuplicateSlug(record.slug)),
            Err(e) if is_slug_violation(&e) => Err(StoreError::DuplicateSlug(record.slug)),
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, slug: &str) -> Result<Option<UrlRecord>, StoreError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT id, slug, target_url, created_at, clicks
            FROM urls
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn increment_clicks(&self, slug: &str) -> Result<i64, StoreError> {
        let clicks = sqlx::query_scalar::<_, i64>(
            "UPDATE urls SET clicks = clicks + 1 WHERE slug = $1 RETURNING clicks",
        )
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        clicks.ok_or_else(|| StoreError::NotFound(slug.to_string()))
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM urls")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
