//! Session resolution
//!
//! A session is one user's attempt at a tour. Its outcome is decided by an
//! explicit state machine folded over the session's ordered events:
//!
//! ```text
//! NotStarted ──started──► Started ──tourCompleted──► Completed
//!                            │    ──tourAbandoned──► Abandoned
//!                            └── end of events ──► InProgress, or Abandoned
//!                                                  once idle past the threshold
//! ```
//!
//! `Completed` and `Abandoned` are absorbing. Terminal events seen before
//! `started` are ignored.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::types::{EventKind, InteractionEvent};
use crate::utils::minutes_between;

/// Resolved state of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    NotStarted,
    InProgress {
        started_at: DateTime<Utc>,
    },
    Completed {
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    },
    Abandoned {
        started_at: DateTime<Utc>,
        /// No `tourAbandoned` event; inferred from inactivity
        implicit: bool,
    },
}

impl SessionOutcome {
    pub fn is_started(&self) -> bool {
        !matches!(self, SessionOutcome::NotStarted)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, SessionOutcome::Completed { .. })
    }

    pub fn is_abandoned(&self) -> bool {
        matches!(self, SessionOutcome::Abandoned { .. })
    }

    /// Start-to-completion time, only for completed sessions
    pub fn duration_minutes(&self) -> Option<f64> {
        match self {
            SessionOutcome::Completed {
                started_at,
                completed_at,
            } => Some(minutes_between(*started_at, *completed_at)),
            _ => None,
        }
    }
}

/// Resolve a session from its events, ordered by timestamp
pub fn classify_session(
    events: &[&InteractionEvent],
    now: DateTime<Utc>,
    inactivity_threshold: Duration,
) -> SessionOutcome {
    let mut state = SessionOutcome::NotStarted;

    for event in events {
        state = match (state, event.kind) {
            (SessionOutcome::NotStarted, EventKind::Started) => SessionOutcome::InProgress {
                started_at: event.timestamp,
            },
            (SessionOutcome::InProgress { started_at }, EventKind::TourCompleted) => {
                SessionOutcome::Completed {
                    started_at,
                    completed_at: event.timestamp,
                }
            }
            (SessionOutcome::InProgress { started_at }, EventKind::TourAbandoned) => {
                SessionOutcome::Abandoned {
                    started_at,
                    implicit: false,
                }
            }
            (current, _) => current,
        };
    }

    if let SessionOutcome::InProgress { started_at } = state {
        let last_activity = events
            .iter()
            .map(|e| e.timestamp)
            .max()
            .unwrap_or(started_at);
        if now - last_activity > inactivity_threshold {
            return SessionOutcome::Abandoned {
                started_at,
                implicit: true,
            };
        }
    }

    state
}

/// Group events by session id, keeping each session's event order
///
/// Sessions are returned in order of their first event.
pub fn partition_sessions(events: &[InteractionEvent]) -> Vec<(&str, Vec<&InteractionEvent>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut sessions: Vec<(&str, Vec<&InteractionEvent>)> = Vec::new();

    for event in events {
        let id = event.user_session_id.as_str();
        match index.get(id) {
            Some(&i) => sessions[i].1.push(event),
            None => {
                index.insert(id, sessions.len());
                sessions.push((id, vec![event]));
            }
        }
    }

    sessions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap() + Duration::minutes(minute)
    }

    fn ev(kind: EventKind, minute: i64) -> InteractionEvent {
        InteractionEvent::new("t1", 1, "s1", kind, at(minute))
    }

    fn classify(events: &[InteractionEvent], now_minute: i64) -> SessionOutcome {
        let refs: Vec<&InteractionEvent> = events.iter().collect();
        classify_session(&refs, at(now_minute), Duration::hours(24))
    }

    #[test]
    fn test_not_started() {
        assert_eq!(classify(&[], 0), SessionOutcome::NotStarted);
        assert_eq!(
            classify(&[ev(EventKind::StepCompleted, 0)], 5),
            SessionOutcome::NotStarted
        );
    }

    #[test]
    fn test_terminal_before_start_ignored() {
        let events = [ev(EventKind::TourCompleted, 0), ev(EventKind::Started, 1)];
        assert_eq!(
            classify(&events, 2),
            SessionOutcome::InProgress { started_at: at(1) }
        );
    }

    #[test]
    fn test_completed_with_duration() {
        let events = [
            ev(EventKind::Started, 0),
            ev(EventKind::StepCompleted, 4),
            ev(EventKind::TourCompleted, 10),
        ];
        let outcome = classify(&events, 60);
        assert!(outcome.is_completed());
        assert_eq!(outcome.duration_minutes(), Some(10.0));
    }

    #[test]
    fn test_first_terminal_event_wins() {
        let events = [
            ev(EventKind::Started, 0),
            ev(EventKind::TourAbandoned, 3),
            ev(EventKind::TourCompleted, 5),
        ];
        assert_eq!(
            classify(&events, 10),
            SessionOutcome::Abandoned {
                started_at: at(0),
                implicit: false
            }
        );
    }

    #[test]
    fn test_inactivity_threshold() {
        let events = [ev(EventKind::Started, 0), ev(EventKind::StepCompleted, 30)];

        // Exactly at the threshold the session is still in progress
        assert!(matches!(
            classify(&events, 30 + 24 * 60),
            SessionOutcome::InProgress { .. }
        ));
        assert_eq!(
            classify(&events, 31 + 24 * 60),
            SessionOutcome::Abandoned {
                started_at: at(0),
                implicit: true
            }
        );
    }

    #[test]
    fn test_partition_keeps_first_seen_order() {
        let events = vec![
            InteractionEvent::new("t1", 1, "b", EventKind::Started, at(0)),
            InteractionEvent::new("t1", 1, "a", EventKind::Started, at(1)),
            InteractionEvent::new("t1", 2, "b", EventKind::StepCompleted, at(2)),
        ];

        let sessions = partition_sessions(&events);
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].0, "b");
        assert_eq!(sessions[0].1.len(), 2);
        assert_eq!(sessions[1].0, "a");
    }
}
