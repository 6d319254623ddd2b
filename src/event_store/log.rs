//! In-memory event log shared by both store implementations

use crate::types::{InteractionEvent, RecordedEvent, TimeRange};

/// Recorded events in insertion order
#[derive(Debug)]
pub(crate) struct EventLog {
    events: Vec<RecordedEvent>,
    next_sequence: u64,
}

impl EventLog {
    pub(crate) fn new() -> Self {
        Self {
            events: Vec::new(),
            next_sequence: 1,
        }
    }

    /// Rebuild from events loaded off disk, already in insertion order
    pub(crate) fn from_recorded(events: Vec<RecordedEvent>) -> Self {
        let next_sequence = events.iter().map(|e| e.sequence).max().unwrap_or(0) + 1;
        Self {
            events,
            next_sequence,
        }
    }

    pub(crate) fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Tag an event with the next sequence without recording it yet
    pub(crate) fn stamp(&self, event: InteractionEvent) -> RecordedEvent {
        RecordedEvent {
            sequence: self.next_sequence,
            event,
        }
    }

    pub(crate) fn push(&mut self, recorded: RecordedEvent) {
        self.next_sequence = self.next_sequence.max(recorded.sequence + 1);
        self.events.push(recorded);
    }

    pub(crate) fn select(&self, tour_id: &str, range: TimeRange) -> Vec<InteractionEvent> {
        let mut matching: Vec<InteractionEvent> = self
            .events
            .iter()
            .filter(|r| r.event.tour_id == tour_id && range.contains(r.event.timestamp))
            .map(|r| r.event.clone())
            .collect();

        // Stable sort keeps insertion order among equal timestamps
        matching.sort_by_key(|e| e.timestamp);
        matching
    }

    pub(crate) fn recorded(&self) -> &[RecordedEvent] {
        &self.events
    }
}
