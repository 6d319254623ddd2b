//! Stats API
//!
//! Assembles aggregator and trend outputs for the dashboard. Adds only tour
//! existence checks, the read deadline and the injectable clock; every number
//! comes from the pure functions in `aggregator` and `trend`.

use std::sync::Arc;

use super::aggregator::{compute_step_analytics, compute_tour_stats};
use super::clock::{Clock, SystemClock};
use super::config::AnalyticsConfig;
use super::trend::{completion_trend, trend_window};
use crate::catalog::TourCatalog;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::event_store::EventStore;
use crate::types::{CompletionTrend, InteractionEvent, StepAnalytics, TimeRange, TourStats};

/// Read-only analytics over the catalog and the event store
pub struct StatsService {
    catalog: Arc<TourCatalog>,
    store: Arc<dyn EventStore>,
    config: AnalyticsConfig,
    clock: Arc<dyn Clock>,
}

impl StatsService {
    pub fn new(
        catalog: Arc<TourCatalog>,
        store: Arc<dyn EventStore>,
        config: AnalyticsConfig,
    ) -> Self {
        Self {
            catalog,
            store,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the wall clock, e.g. with a `FixedClock` in tests
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn catalog(&self) -> &Arc<TourCatalog> {
        &self.catalog
    }

    pub fn store(&self) -> &Arc<dyn EventStore> {
        &self.store
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Read a tour's events, failing with `Timeout` past the read deadline
    async fn load_events(
        &self,
        tour_id: &str,
        range: TimeRange,
    ) -> AnalyticsResult<Vec<InteractionEvent>> {
        let deadline = self.config.read_timeout;
        let query = self.store.query_events(tour_id, range);
        match tokio::time::timeout(deadline, query).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    tour_id,
                    timeout_ms = deadline.as_millis() as u64,
                    "Event store read timed out"
                );
                Err(AnalyticsError::Timeout(deadline))
            }
        }
    }

    /// Summary metrics for a tour over `range`
    pub async fn tour_stats(&self, tour_id: &str, range: TimeRange) -> AnalyticsResult<TourStats> {
        let range = TimeRange::new(range.start, range.end)?;
        self.catalog.require(tour_id)?;

        let events = self.load_events(tour_id, range).await?;
        let now = self.clock.now();
        let stats = compute_tour_stats(&events, self.catalog.count(), &self.config, now);

        tracing::debug!(
            tour_id,
            events = events.len(),
            sessions_started = stats.total_sessions_started,
            "Computed tour stats"
        );
        Ok(stats)
    }

    /// Completed/skipped counts for every step of a tour over `range`
    pub async fn step_analytics(
        &self,
        tour_id: &str,
        range: TimeRange,
    ) -> AnalyticsResult<Vec<StepAnalytics>> {
        let range = TimeRange::new(range.start, range.end)?;
        let tour = self.catalog.require(tour_id)?;

        let events = self.load_events(tour_id, range).await?;
        tracing::debug!(tour_id, events = events.len(), "Computed step analytics");
        Ok(compute_step_analytics(&tour, &events))
    }

    /// Daily completions for the `days` days ending today (UTC)
    pub async fn completion_trend(
        &self,
        tour_id: &str,
        days: u32,
    ) -> AnalyticsResult<Vec<CompletionTrend>> {
        self.catalog.require(tour_id)?;

        let today = self.clock.now().date_naive();
        let (_, window) = trend_window(days, today)?;
        let events = self.load_events(tour_id, window).await?;

        tracing::debug!(tour_id, days, events = events.len(), "Computed completion trend");
        completion_trend(&events, days, today)
    }
}
