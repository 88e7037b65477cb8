#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use chrono::Utc;
use slug_shortener::domain::allocation_policy::AllocationPolicy;
use slug_shortener::domain::entities::{NewUrlRecord, UrlRecord};
use slug_shortener::domain::repositories::RecordStore;
use slug_shortener::infrastructure::persistence::MemoryRecordStore;
use slug_shortener::routes::unthrottled_routes;
use slug_shortener::state::AppState;
use slug_shortener::utils::slug_generator::SlugGenerator;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Generator that replays a fixed list of candidates and records the
/// requested lengths.
pub struct ScriptedGenerator {
    candidates: Mutex<VecDeque<String>>,
    requested_lengths: Mutex<Vec<usize>>,
}

impl ScriptedGenerator {
    pub fn new(candidates: &[&str]) -> Self {
        Self {
            candidates: Mutex::new(candidates.iter().map(|c| c.to_string()).collect()),
            requested_lengths: Mutex::new(Vec::new()),
        }
    }

    pub fn requested_lengths(&self) -> Vec<usize> {
        self.requested_lengths.lock().unwrap().clone()
    }
}

impl SlugGenerator for ScriptedGenerator {
    fn generate(&self, length: usize) -> String {
        self.requested_lengths.lock().unwrap().push(length);
        self.candidates
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted generator ran out of candidates")
    }
}

pub fn create_test_state() -> (AppState, Arc<MemoryRecordStore>) {
    let store = Arc::new(MemoryRecordStore::new());
    let state = AppState::new(store.clone(), AllocationPolicy::default());
    (state, store)
}

pub fn create_test_state_with_generator(
    generator: Arc<dyn SlugGenerator>,
    policy: AllocationPolicy,
) -> (AppState, Arc<MemoryRecordStore>) {
    let store = Arc::new(MemoryRecordStore::new());
    let state = AppState::with_generator(store.clone(), generator, policy);
    (state, store)
}

pub fn create_test_app(state: AppState) -> Router {
    unthrottled_routes().with_state(state)
}

pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(create_test_app(state)).unwrap()
}

pub async fn create_test_record(store: &MemoryRecordStore, slug: &str, url: &str) -> UrlRecord {
    store
        .insert(NewUrlRecord::new(
            slug.to_string(),
            url.to_string(),
            Utc::now(),
        ))
        .await
        .unwrap()
}

/// Extracts the slug from a `{"short_url": "/<slug>"}` response body.
pub fn slug_from_short_url(body: &serde_json::Value) -> String {
    body["short_url"]
        .as_str()
        .unwrap()
        .trim_start_matches('/')
        .to_string()
}
