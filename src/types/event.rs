//! Interaction events recorded while end users go through a tour
//!
//! Events are immutable facts. The event store appends them to its log and
//! never rewrites or deletes them; every metric is derived by replaying them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};

/// Kinds of interaction a session can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    /// The user opened the tour
    Started,
    /// The user finished a step
    StepCompleted,
    /// The user skipped a step
    StepSkipped,
    /// The user reached the end of the tour
    TourCompleted,
    /// The user closed the tour before the end
    TourAbandoned,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Started => write!(f, "started"),
            EventKind::StepCompleted => write!(f, "stepCompleted"),
            EventKind::StepSkipped => write!(f, "stepSkipped"),
            EventKind::TourCompleted => write!(f, "tourCompleted"),
            EventKind::TourAbandoned => write!(f, "tourAbandoned"),
        }
    }
}

/// A single interaction of one session with one step of a tour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionEvent {
    pub tour_id: String,
    pub step_order: u32,
    pub user_session_id: String,
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
}

impl InteractionEvent {
    pub fn new(
        tour_id: impl Into<String>,
        step_order: u32,
        user_session_id: impl Into<String>,
        kind: EventKind,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            tour_id: tour_id.into(),
            step_order,
            user_session_id: user_session_id.into(),
            kind,
            timestamp,
        }
    }
}

/// An event as persisted by the store, tagged with its insertion sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEvent {
    /// Monotonic insertion number, starting at 1
    pub sequence: u64,
    #[serde(flatten)]
    pub event: InteractionEvent,
}

impl RecordedEvent {
    /// Serialize to a single JSONL line
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from a single JSONL line
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Half-open time window `[start, end)`; a missing bound is unbounded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    /// Build a window, rejecting one whose end precedes its start
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> AnalyticsResult<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if e < s {
                return Err(AnalyticsError::Validation(format!(
                    "Time window end ({}) is before its start ({})",
                    e.to_rfc3339(),
                    s.to_rfc3339()
                )));
            }
        }
        Ok(Self { start, end })
    }

    /// The unbounded window
    pub fn all_time() -> Self {
        Self::default()
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| ts >= s) && self.end.map_or(true, |e| ts < e)
    }
}
