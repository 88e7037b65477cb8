//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AllocationService, RedirectService, StatsService};
use crate::domain::allocation_policy::AllocationPolicy;
use crate::domain::repositories::RecordStore;
use crate::utils::slug_generator::{RandomSlugGenerator, SlugGenerator};

/// Handles to the services, all sharing one record store.
#[derive(Clone)]
pub struct AppState {
    pub allocation_service: Arc<AllocationService>,
    pub redirect_service: Arc<RedirectService>,
    pub stats_service: Arc<StatsService>,
    pub store: Arc<dyn RecordStore>,
}

impl AppState {
    /// Wires the services around `store` with the random slug generator.
    pub fn new(store: Arc<dyn RecordStore>, policy: AllocationPolicy) -> Self {
        Self::with_generator(store, Arc::new(RandomSlugGenerator), policy)
    }

    /// Wires the services around `store` with a caller-supplied generator.
    pub fn with_generator(
        store: Arc<dyn RecordStore>,
        generator: Arc<dyn SlugGenerator>,
        policy: AllocationPolicy,
    ) -> Self {
        Self {
            allocation_service: Arc::new(AllocationService::new(store.clone(), generator, policy)),
            redirect_service: Arc::new(RedirectService::new(store.clone())),
            stats_service: Arc::new(StatsService::new(store.clone())),
            store,
        }
    }
}
