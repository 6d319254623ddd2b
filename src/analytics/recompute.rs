//! Background recomputation of tour stats
//!
//! `RecomputeJob` walks the catalog and refreshes `StatsCache` one tour at a
//! time. Cancellation is cooperative: the token is checked before each tour,
//! so a running aggregation always finishes and the cache never holds a
//! half-computed entry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::service::StatsService;
use crate::error::AnalyticsError;
use crate::types::{TimeRange, TourStats};

/// All-time stats of one tour as of `computed_at`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedStats {
    pub stats: TourStats,
    pub computed_at: DateTime<Utc>,
}

/// Memoized stats per tour id
#[derive(Default)]
pub struct StatsCache {
    entries: RwLock<HashMap<String, CachedStats>>,
}

impl StatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tour_id: &str) -> Option<CachedStats> {
        self.entries.read().get(tour_id).cloned()
    }

    pub fn insert(&self, tour_id: String, stats: TourStats) {
        let entry = CachedStats {
            stats,
            computed_at: Utc::now(),
        };
        self.entries.write().insert(tour_id, entry);
    }

    pub fn remove(&self, tour_id: &str) {
        self.entries.write().remove(tour_id);
    }

    /// Drop entries of tours not in `tour_ids`
    pub fn retain_tours(&self, tour_ids: &[String]) {
        self.entries.write().retain(|id, _| tour_ids.contains(id));
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of one pass over the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecomputeSummary {
    pub tours_processed: usize,
    pub failures: usize,
    pub cancelled: bool,
}

/// Recomputes every tour's stats into a cache
pub struct RecomputeJob {
    service: Arc<StatsService>,
    cache: Arc<StatsCache>,
}

impl RecomputeJob {
    pub fn new(service: Arc<StatsService>, cache: Arc<StatsCache>) -> Self {
        Self { service, cache }
    }

    /// One pass over all tours, stopping early once `token` is cancelled
    pub async fn run(&self, token: &CancellationToken) -> RecomputeSummary {
        let tours = self.service.catalog().list();
        let mut summary = RecomputeSummary::default();

        for tour in &tours {
            if token.is_cancelled() {
                summary.cancelled = true;
                tracing::info!(
                    processed = summary.tours_processed,
                    remaining = tours.len() - summary.tours_processed - summary.failures,
                    "Stats recomputation cancelled"
                );
                return summary;
            }

            match self.service.tour_stats(&tour.id, TimeRange::all_time()).await {
                Ok(stats) => {
                    self.cache.insert(tour.id.clone(), stats);
                    summary.tours_processed += 1;
                }
                Err(AnalyticsError::NotFound(_)) => {
                    // Deleted while the pass was running
                    self.cache.remove(&tour.id);
                    summary.tours_processed += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        tour_id = %tour.id,
                        error = %e,
                        "Failed to recompute tour stats"
                    );
                    summary.failures += 1;
                }
            }
        }

        let ids: Vec<String> = self.service.catalog().list().into_iter().map(|t| t.id).collect();
        self.cache.retain_tours(&ids);

        tracing::debug!(
            processed = summary.tours_processed,
            failures = summary.failures,
            "Stats recomputation finished"
        );
        summary
    }

    /// Run a pass every `interval` until `token` is cancelled
    pub async fn run_every(self, interval: Duration, token: CancellationToken) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    self.run(&token).await;
                }
            }
        }
        tracing::info!("Stats recompute job stopped");
    }
}
