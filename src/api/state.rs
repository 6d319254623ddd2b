//! Shared application state for request handlers

use std::sync::Arc;

use crate::analytics::{StatsCache, StatsService};
use crate::catalog::TourCatalog;
use crate::event_store::EventStore;

/// Handles shared by every request
pub struct AppState {
    pub catalog: Arc<TourCatalog>,
    pub store: Arc<dyn EventStore>,
    pub stats: Arc<StatsService>,
    /// All-time stats filled by the recompute job
    pub cache: Arc<StatsCache>,
}

impl AppState {
    /// Build the state around a stats service, sharing its catalog and store
    pub fn new(stats: Arc<StatsService>) -> Self {
        Self {
            catalog: stats.catalog().clone(),
            store: stats.store().clone(),
            stats,
            cache: Arc::new(StatsCache::new()),
        }
    }

    /// Share the cache the recompute job writes to
    pub fn with_cache(mut self, cache: Arc<StatsCache>) -> Self {
        self.cache = cache;
        self
    }
}
