//! In-memory event store

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::log::EventLog;
use super::stats::EventLogStats;
use super::{validate_event, EventStore};
use crate::catalog::TourCatalog;
use crate::error::AnalyticsResult;
use crate::types::{InteractionEvent, RecordedEvent, TimeRange};

/// Reference event store; contents are lost when dropped
pub struct MemoryEventStore {
    catalog: Arc<TourCatalog>,
    log: RwLock<EventLog>,
}

impl MemoryEventStore {
    pub fn new(catalog: Arc<TourCatalog>) -> Self {
        Self {
            catalog,
            log: RwLock::new(EventLog::new()),
        }
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn append_event(&self, event: InteractionEvent) -> AnalyticsResult<RecordedEvent> {
        validate_event(&self.catalog, &event)?;

        let mut log = self.log.write();
        let recorded = log.stamp(event);
        log.push(recorded.clone());
        Ok(recorded)
    }

    async fn query_events(
        &self,
        tour_id: &str,
        range: TimeRange,
    ) -> AnalyticsResult<Vec<InteractionEvent>> {
        Ok(self.log.read().select(tour_id, range))
    }

    async fn stats(&self) -> AnalyticsResult<EventLogStats> {
        Ok(EventLogStats::collect(self.log.read().recorded(), 0))
    }
}
