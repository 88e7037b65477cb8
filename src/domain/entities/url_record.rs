//! URL record entity: the persisted mapping from a slug to its target.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored URL record.
///
/// `slug`, `target_url` and `created_at` are fixed at creation. `clicks` only
/// ever grows, and only through
/// [`RecordStore::increment_clicks`](crate::domain::repositories::RecordStore::increment_clicks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub id: i64,
    pub slug: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
    pub clicks: i64,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(
        id: i64,
        slug: String,
        target_url: String,
        created_at: DateTime<Utc>,
        clicks: i64,
    ) -> Self {
        Self {
            id,
            slug,
            target_url,
            created_at,
            clicks,
        }
    }
}

/// Input data for inserting a new record.
///
/// The store assigns `id` and starts `clicks` at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub slug: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
}

impl NewUrlRecord {
    pub fn new(slug: String, target_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            slug,
            target_url,
            created_at,
        }
    }
}

/// Read-only projection of a record returned by the stats endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlStats {
    pub target_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl From<UrlRecord> for UrlStats {
    fn from(record: UrlRecord) -> Self {
        Self {
            target_url: record.target_url,
            clicks: record.clicks,
            created_at: record.created_at,
        }
    }
}
