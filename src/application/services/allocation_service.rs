//! Slug allocation service.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::allocation_policy::AllocationPolicy;
use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::errors::StoreError;
use crate::domain::repositories::RecordStore;
use crate::error::AppError;
use crate::utils::slug_generator::{SlugGenerator, is_reserved};

/// Service that reserves a unique slug for a new target URL.
///
/// # Uniqueness
///
/// The store's insert is the only authority on whether a slug is free. The
/// `exists` check before it just avoids a doomed insert; when two allocators
/// race on the same candidate, the loser gets [`StoreError::DuplicateSlug`]
/// from the insert and simply tries again. No lock is shared between
/// allocators.
///
/// # Retry policy
///
/// Candidate lengths and the attempt budget come from [`AllocationPolicy`].
/// Reserved words and both kinds of collision (pre-check hit, lost insert
/// race) all count as collisions for length escalation and as attempts
/// against the budget.
pub struct AllocationService<
    S: RecordStore + ?Sized = dyn RecordStore,
    G: SlugGenerator + ?Sized = dyn SlugGenerator,
> {
    store: Arc<S>,
    generator: Arc<G>,
    policy: AllocationPolicy,
}

impl<S: RecordStore + ?Sized, G: SlugGenerator + ?Sized> AllocationService<S, G> {
    /// Creates a new allocation service.
    pub fn new(store: Arc<S>, generator: Arc<G>, policy: AllocationPolicy) -> Self {
        Self {
            store,
            generator,
            policy,
        }
    }

    /// Returns the retry policy in effect.
    pub fn policy(&self) -> &AllocationPolicy {
        &self.policy
    }

    /// Allocates a slug for `target_url` and persists the record.
    ///
    /// `target_url` is stored as given; it is not parsed or normalized.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AllocationExhausted`] after `max_attempts`
    /// candidates were all rejected.
    ///
    /// Returns [`AppError::Unavailable`] if the store cannot be reached.
    pub async fn allocate(&self, target_url: String) -> Result<UrlRecord, AppError> {
        let mut collisions: u32 = 0;

        for attempt in 1..=self.policy.max_attempts {
            let length = self.policy.length_for(collisions);
            let slug = self.generator.generate(length);

            if is_reserved(&slug) {
                debug!(%slug, attempt, "candidate is a reserved word");
                metrics::counter!("slug_collisions_total", "reason" => "reserved").increment(1);
                collisions += 1;
                continue;
            }

            if self.store.exists(&slug).await? {
                debug!(%slug, attempt, "slug collision on pre-check");
                metrics::counter!("slug_collisions_total", "reason" => "precheck").increment(1);
                collisions += 1;
                continue;
            }

            let new_record = NewUrlRecord::new(slug, target_url.clone(), Utc::now());

            match self.store.insert(new_record).await {
                Ok(record) => {
                    info!(slug = %record.slug, id = record.id, attempt, "slug allocated");
                    metrics::counter!("slugs_allocated_total").increment(1);
                    return Ok(record);
                }
                Err(StoreError::DuplicateSlug(slug)) => {
                    debug!(%slug, attempt, "slug collision on insert");
                    metrics::counter!("slug_collisions_total", "reason" => "insert_race")
                        .increment(1);
                    collisions += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(
            attempts = self.policy.max_attempts,
            "slug allocation exhausted its retry budget"
        );
        metrics::counter!("slug_allocation_exhausted_total").increment(1);

        Err(AppError::allocation_exhausted(
            "Failed to allocate a unique slug",
            json!({ "attempts": self.policy.max_attempts }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockRecordStore;
    use crate::utils::slug_generator::MockSlugGenerator;
    use chrono::Utc;
    use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
    use mockall::Sequence;
    use mockall::predicate::eq;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn record_from(new_record: &NewUrlRecord) -> UrlRecord {
        UrlRecord::new(
            1,
            new_record.slug.clone(),
            new_record.target_url.clone(),
            new_record.created_at,
            0,
        )
    }

    fn service(
        store: MockRecordStore,
        generator: MockSlugGenerator,
        policy: AllocationPolicy,
    ) -> AllocationService<MockRecordStore, MockSlugGenerator> {
        AllocationService::new(Arc::new(store), Arc::new(generator), policy)
    }

    #[tokio::test]
    async fn test_allocate_success_first_try() {
        let mut store = MockRecordStore::new();
        let mut generator = MockSlugGenerator::new();

        generator
            .expect_generate()
            .with(eq(6))
            .times(1)
            .returning(|_| "abc123".to_string());

        store
            .expect_exists()
            .withf(|slug| slug == "abc123")
            .times(1)
            .returning(|_| Ok(false));

        store
            .expect_insert()
            .withf(|r| r.slug == "abc123" && r.target_url == "https://example.com")
            .times(1)
            .returning(|r| Ok(record_from(&r)));

        let service = service(store, generator, AllocationPolicy::default());

        let before = Utc::now();
        let record = service
            .allocate("https://example.com".to_string())
            .await
            .unwrap();

        assert_eq!(record.slug, "abc123");
        assert_eq!(record.target_url, "https://example.com");
        assert_eq!(record.clicks, 0);
        assert!(record.created_at >= before);
    }

    #[tokio::test]
    async fn test_allocate_escalates_to_seven_after_first_collision() {
        let mut store = MockRecordStore::new();
        let mut generator = MockSlugGenerator::new();
        let mut seq = Sequence::new();

        generator
            .expect_generate()
            .with(eq(6))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| "taken1".to_string());

        generator
            .expect_generate()
            .with(eq(7))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| "fresh12".to_string());

        store
            .expect_exists()
            .withf(|slug| slug == "taken1")
            .times(1)
            .returning(|_| Ok(true));

        store
            .expect_exists()
            .withf(|slug| slug == "fresh12")
            .times(1)
            .returning(|_| Ok(false));

        store
            .expect_insert()
            .withf(|r| r.slug == "fresh12")
            .times(1)
            .returning(|r| Ok(record_from(&r)));

        let service = service(store, generator, AllocationPolicy::default());

        let record = service
            .allocate("https://example.com".to_string())
            .await
            .unwrap();

        assert_eq!(record.slug, "fresh12");
        assert_eq!(record.slug.len(), 7);
    }

    #[tokio::test]
    async fn test_allocate_retries_after_lost_insert_race() {
        let mut store = MockRecordStore::new();
        let mut generator = MockSlugGenerator::new();
        let mut seq = Sequence::new();

        generator
            .expect_generate()
            .with(eq(6))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| "racy00".to_string());

        generator
            .expect_generate()
            .with(eq(7))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| "winner7".to_string());

        store.expect_exists().times(2).returning(|_| Ok(false));

        store
            .expect_insert()
            .withf(|r| r.slug == "racy00")
            .times(1)
            .returning(|r| Err(StoreError::DuplicateSlug(r.slug)));

        store
            .expect_insert()
            .withf(|r| r.slug == "winner7")
            .times(1)
            .returning(|r| Ok(record_from(&r)));

        let service = service(store, generator, AllocationPolicy::default());

        let record = service
            .allocate("https://example.com".to_string())
            .await
            .unwrap();

        assert_eq!(record.slug, "winner7");
    }

    #[tokio::test]
    async fn test_allocate_skips_reserved_words() {
        let mut store = MockRecordStore::new();
        let mut generator = MockSlugGenerator::new();
        let mut seq = Sequence::new();

        generator
            .expect_generate()
            .with(eq(6))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| "health".to_string());

        generator
            .expect_generate()
            .with(eq(7))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| "Zz9Zz9Z".to_string());

        store
            .expect_exists()
            .withf(|slug| slug == "Zz9Zz9Z")
            .times(1)
            .returning(|_| Ok(false));

        store
            .expect_insert()
            .times(1)
            .returning(|r| Ok(record_from(&r)));

        let service = service(store, generator, AllocationPolicy::default());

        let record = service
            .allocate("https://example.com".to_string())
            .await
            .unwrap();

        assert_eq!(record.slug, "Zz9Zz9Z");
    }

    /// Counts every counter increment by name and labels.
    #[derive(Default)]
    struct CountingRecorder {
        counters: Mutex<HashMap<String, Arc<AtomicU64>>>,
    }

    impl CountingRecorder {
        fn value(&self, name: &str) -> u64 {
            self.counters
                .lock()
                .unwrap()
                .get(name)
                .map_or(0, |c| c.load(Ordering::Relaxed))
        }

        fn collisions(&self, reason: &str) -> u64 {
            self.value(&format!("slug_collisions_total{{reason={reason}}}"))
        }
    }

    impl Recorder for CountingRecorder {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            let labels: Vec<String> = key
                .labels()
                .map(|l| format!("{}={}", l.key(), l.value()))
                .collect();
            let name = format!("{}{{{}}}", key.name(), labels.join(","));

            let counter = self
                .counters
                .lock()
                .unwrap()
                .entry(name)
                .or_default()
                .clone();
            Counter::from_arc(counter)
        }

        fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }

        fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    #[test]
    fn test_every_collision_is_counted_by_reason() {
        let mut store = MockRecordStore::new();
        let mut generator = MockSlugGenerator::new();
        let mut seq = Sequence::new();

        for slug in ["stats", "taken1", "raced1", "winner1"] {
            generator
                .expect_generate()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_| slug.to_string());
        }

        store.expect_exists().returning(|slug| Ok(slug == "taken1"));

        store
            .expect_insert()
            .withf(|r| r.slug == "raced1")
            .times(1)
            .returning(|r| Err(StoreError::DuplicateSlug(r.slug)));

        store
            .expect_insert()
            .withf(|r| r.slug == "winner1")
            .times(1)
            .returning(|r| Ok(record_from(&r)));

        let service = service(store, generator, AllocationPolicy::default());
        let recorder = CountingRecorder::default();

        let record = metrics::with_local_recorder(&recorder, || {
            tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap()
                .block_on(service.allocate("https://example.com".to_string()))
        })
        .unwrap();

        assert_eq!(record.slug, "winner1");
        assert_eq!(recorder.collisions("reserved"), 1);
        assert_eq!(recorder.collisions("precheck"), 1);
        assert_eq!(recorder.collisions("insert_race"), 1);
        assert_eq!(recorder.value("slugs_allocated_total{}"), 1);
    }

    #[tokio::test]
    async fn test_allocate_bounded_retry_before_escalation() {
        let mut store = MockRecordStore::new();
        let mut generator = MockSlugGenerator::new();
        let mut seq = Sequence::new();

        generator
            .expect_generate()
            .with(eq(6))
            .times(3)
            .in_sequence(&mut seq)
            .returning(|_| "taken1".to_string());

        generator
            .expect_generate()
            .with(eq(7))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| "fresh12".to_string());

        store
            .expect_exists()
            .withf(|slug| slug == "taken1")
            .times(3)
            .returning(|_| Ok(true));

        store
            .expect_exists()
            .withf(|slug| slug == "fresh12")
            .times(1)
            .returning(|_| Ok(false));

        store
            .expect_insert()
            .times(1)
            .returning(|r| Ok(record_from(&r)));

        let policy = AllocationPolicy {
            attempts_before_escalation: 3,
            ..AllocationPolicy::default()
        };
        let service = service(store, generator, policy);

        let record = service
            .allocate("https://example.com".to_string())
            .await
            .unwrap();

        assert_eq!(record.slug, "fresh12");
    }

    #[tokio::test]
    async fn test_allocate_exhausted() {
        let mut store = MockRecordStore::new();
        let mut generator = MockSlugGenerator::new();

        generator
            .expect_generate()
            .times(5)
            .returning(|_| "stuck0".to_string());

        store.expect_exists().times(5).returning(|_| Ok(true));
        store.expect_insert().times(0);

        let policy = AllocationPolicy {
            max_attempts: 5,
            ..AllocationPolicy::default()
        };
        let service = service(store, generator, policy);

        let result = service.allocate("https://example.com".to_string()).await;

        assert!(matches!(result, Err(AppError::AllocationExhausted { .. })));
    }

    #[tokio::test]
    async fn test_allocate_store_unavailable_is_not_retried() {
        let mut store = MockRecordStore::new();
        let mut generator = MockSlugGenerator::new();

        generator
            .expect_generate()
            .times(1)
            .returning(|_| "abc123".to_string());

        store
            .expect_exists()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("connection refused".to_string())));

        let service = service(store, generator, AllocationPolicy::default());

        let result = service.allocate("https://example.com".to_string()).await;

        assert!(matches!(result, Err(AppError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn test_allocate_accepts_empty_target() {
        let mut store = MockRecordStore::new();
        let mut generator = MockSlugGenerator::new();

        generator
            .expect_generate()
            .returning(|_| "empty0".to_string());

        store.expect_exists().returning(|_| Ok(false));

        store
            .expect_insert()
            .withf(|r| r.target_url.is_empty())
            .times(1)
            .returning(|r| Ok(record_from(&r)));

        let service = service(store, generator, AllocationPolicy::default());

        let record = service.allocate(String::new()).await.unwrap();

        assert_eq!(record.target_url, "");
    }
}
