//! DTOs for the stats endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::UrlStats;

/// Click statistics for a single slug.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub target_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl From<UrlStats> for StatsResponse {
    fn from(stats: UrlStats) -> Self {
        Self {
            target_url: stats.target_url,
            clicks: stats.clicks,
            created_at: stats.created_at,
        }
    }
}
