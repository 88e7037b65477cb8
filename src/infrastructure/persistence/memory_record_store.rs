//! In-process record store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::errors::StoreError;
use crate::domain::repositories::RecordStore;

/// A record as held in the map. Everything but `clicks` is frozen.
#[derive(Debug)]
struct StoredRecord {
    id: i64,
    slug: String,
    target_url: String,
    created_at: DateTime<Utc>,
    clicks: AtomicI64,
}

impl StoredRecord {
    fn snapshot(&self) -> UrlRecord {
        UrlRecord::new(
            self.id,
            self.slug.clone(),
            self.target_url.clone(),
            self.created_at,
            self.clicks.load(Ordering::Acquire),
        )
    }
}

/// Record store backed by a sharded concurrent map.
///
/// Uniqueness comes from the map's entry API, which holds the shard lock
/// across the occupied/vacant decision and the write. Click counters are
/// atomics shared through `Arc`, so increments take only a shard read lock
/// for the lookup and never block each other. Contents live for the lifetime
/// of the process.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: DashMap<String, Arc<StoredRecord>>,
    next_id: AtomicI64,
}

impl MemoryRecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lookup(&self, slug: &str) -> Option<Arc<StoredRecord>> {
        self.records
            .get(slug)
            .map(|entry| Arc::clone(entry.value()))
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn exists(&self, slug: &str) -> Result<bool, StoreError> {
        Ok(self.records.contains_key(slug))
    }

    async fn insert(&self, record: NewUrlRecord) -> Result<UrlRecord, StoreError> {
        match self.records.entry(record.slug) {
            Entry::Occupied(entry) => Err(StoreError::DuplicateSlug(entry.key().clone())),
            Entry::Vacant(entry) => {
                let stored = Arc::new(StoredRecord {
                    id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
                    slug: entry.key().clone(),
                    target_url: record.target_url,
                    created_at: record.created_at,
                    clicks: AtomicI64::new(0),
                });
                let snapshot = stored.snapshot();
                entry.insert(stored);
                Ok(snapshot)
            }
        }
    }

    async fn get(&self, slug: &str) -> Result<Option<UrlRecord>, StoreError> {
        Ok(self.lookup(slug).map(|stored| stored.snapshot()))
    }

    async fn increment_clicks(&self, slug: &str) -> Result<i64, StoreError> {
        let stored = self
            .lookup(slug)
            .ok_or_else(|| StoreError::NotFound(slug.to_string()))?;

        Ok(stored.clicks.fetch_add(1, Ordering::AcqRel) + 1)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.records.len() as i64)
    }
}
