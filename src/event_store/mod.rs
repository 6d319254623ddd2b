//! Event Store
//!
//! Append-only record of tour interaction events, the only input of the
//! analytics engine:
//! - `EventStore`: the read/append interface the engine depends on
//! - `MemoryEventStore`: reference implementation, events live in memory
//! - `FileEventStore`: durable implementation backed by `events.jsonl`
//! - `EventLogStats`: counters describing the log
//!
//! # Guarantees
//!
//! ```text
//! append_event ──► validate against catalog ──► assign sequence
//!              ──► (fsync line) ──► visible
//! query_events ──► filter tour + window ──► order by (timestamp, sequence)
//! ```
//!
//! A recorded event is never modified or removed.

mod file;
mod log;
mod memory;
mod stats;

use async_trait::async_trait;

use crate::catalog::TourCatalog;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::types::{InteractionEvent, RecordedEvent, TimeRange};

pub use file::{FileEventStore, FileEventStoreConfig};
pub use memory::MemoryEventStore;
pub use stats::EventLogStats;

/// Read and append interface over the interaction event log
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Record an event; the tour must exist and own the step
    async fn append_event(&self, event: InteractionEvent) -> AnalyticsResult<RecordedEvent>;

    /// Events of one tour inside `range`, ordered by timestamp then insertion
    async fn query_events(
        &self,
        tour_id: &str,
        range: TimeRange,
    ) -> AnalyticsResult<Vec<InteractionEvent>>;

    /// Counters over the whole log
    async fn stats(&self) -> AnalyticsResult<EventLogStats>;
}

/// Reject events that reference an unknown tour or a step it does not have
pub fn validate_event(catalog: &TourCatalog, event: &InteractionEvent) -> AnalyticsResult<()> {
    if event.user_session_id.trim().is_empty() {
        return Err(AnalyticsError::Validation(
            "userSessionId is required".to_string(),
        ));
    }

    let Some(tour) = catalog.get(&event.tour_id) else {
        return Err(AnalyticsError::Validation(format!(
            "Unknown tour '{}'",
            event.tour_id
        )));
    };

    if !tour.has_step(event.step_order) {
        return Err(AnalyticsError::Validation(format!(
            "Step {} is outside tour '{}' (steps 1..={})",
            event.step_order,
            tour.id,
            tour.step_count()
        )));
    }

    Ok(())
}
