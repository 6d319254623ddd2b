//! Event log statistics
//!
//! Provides counters about the event log:
//! - Event counts by kind
//! - Distinct tours and sessions
//! - Storage size information

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::types::{EventKind, RecordedEvent};

/// Statistics about the event log
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLogStats {
    pub total_events: usize,
    pub events_by_kind: BTreeMap<EventKind, usize>,
    /// Tours that have at least one event, deleted tours included
    pub tours_with_events: usize,
    pub distinct_sessions: usize,
    /// Sequence of the most recent event, 0 when empty
    pub last_sequence: u64,
    /// Size of the on-disk log in bytes, 0 for in-memory stores
    pub log_size_bytes: u64,
    /// `log_size_bytes` in human-readable form
    pub log_size: String,
}

impl EventLogStats {
    /// Compute counters over recorded events
    pub fn collect(events: &[RecordedEvent], log_size_bytes: u64) -> Self {
        let mut events_by_kind = BTreeMap::new();
        let mut tours = HashSet::new();
        let mut sessions = HashSet::new();
        let mut last_sequence = 0;

        for recorded in events {
            let event = &recorded.event;
            *events_by_kind.entry(event.kind).or_insert(0) += 1;
            tours.insert(event.tour_id.as_str());
            sessions.insert((event.tour_id.as_str(), event.user_session_id.as_str()));
            last_sequence = last_sequence.max(recorded.sequence);
        }

        Self {
            total_events: events.len(),
            events_by_kind,
            tours_with_events: tours.len(),
            distinct_sessions: sessions.len(),
            last_sequence,
            log_size_bytes,
            log_size: Self::format_size(log_size_bytes),
        }
    }

    /// Format size in human-readable format
    pub fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.2} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.2} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.2} KB", bytes as f64 / KB as f64)
        } else {
            format!("{} B", bytes)
        }
    }
}
