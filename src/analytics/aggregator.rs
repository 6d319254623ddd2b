//! Aggregator
//!
//! Pure functions turning a tour's events into `TourStats` and per-step
//! tallies. Nothing here touches storage or the clock: callers pass the
//! events and "now" explicitly, so results are deterministic.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use super::config::AnalyticsConfig;
use super::session::{classify_session, partition_sessions, SessionOutcome};
use crate::types::{EventKind, InteractionEvent, StepAnalytics, TourDefinition, TourStats};

/// Session count above which sessions are classified in parallel
const PARALLEL_SESSION_THRESHOLD: usize = 1000;

/// Compute summary metrics over one tour's events
///
/// `events` must belong to a single tour and be ordered by timestamp.
pub fn compute_tour_stats(
    events: &[InteractionEvent],
    tours_created: usize,
    config: &AnalyticsConfig,
    now: DateTime<Utc>,
) -> TourStats {
    let sessions = partition_sessions(events);
    let threshold = config.inactivity_threshold;

    let outcomes: Vec<SessionOutcome> = if sessions.len() > PARALLEL_SESSION_THRESHOLD {
        sessions
            .par_iter()
            .map(|(_, session)| classify_session(session, now, threshold))
            .collect()
    } else {
        sessions
            .iter()
            .map(|(_, session)| classify_session(session, now, threshold))
            .collect()
    };

    let started = outcomes.iter().filter(|o| o.is_started()).count() as u64;
    let completed = outcomes.iter().filter(|o| o.is_completed()).count() as u64;
    let abandoned = outcomes.iter().filter(|o| o.is_abandoned()).count() as u64;

    let durations: Vec<f64> = outcomes.iter().filter_map(|o| o.duration_minutes()).collect();
    let average_duration_in_minutes = if durations.is_empty() {
        0.0
    } else {
        durations.iter().sum::<f64>() / durations.len() as f64
    };

    let steps_skipped = events
        .iter()
        .filter(|e| e.kind == EventKind::StepSkipped)
        .count() as u64;

    let today = now.date_naive();
    let active_today: HashSet<&str> = events
        .iter()
        .filter(|e| e.timestamp.date_naive() == today)
        .map(|e| e.user_session_id.as_str())
        .collect();

    TourStats {
        total_tours_created: tours_created as u64,
        total_tours_completed: completed,
        completion_rate: rate(completed, started),
        steps_skipped,
        average_duration_in_minutes,
        active_tours_today: active_today.len() as u64,
        abandon_rate: rate(abandoned, started),
        total_sessions_started: started,
        total_tours_abandoned: abandoned,
    }
}

/// Completed/skipped tallies for every step of the tour, in step order
///
/// Raw counts of `stepCompleted`/`stepSkipped` events; the owning session's
/// outcome does not matter.
pub fn compute_step_analytics(
    tour: &TourDefinition,
    events: &[InteractionEvent],
) -> Vec<StepAnalytics> {
    let mut tallies = vec![(0u64, 0u64); tour.step_count()];

    for event in events {
        if !tour.has_step(event.step_order) {
            continue;
        }
        let slot = &mut tallies[event.step_order as usize - 1];
        match event.kind {
            EventKind::StepCompleted => slot.0 += 1,
            EventKind::StepSkipped => slot.1 += 1,
            _ => {}
        }
    }

    tallies
        .into_iter()
        .enumerate()
        .map(|(i, (completed, skipped))| StepAnalytics {
            step: StepAnalytics::label(i as u32 + 1),
            completed,
            skipped,
        })
        .collect()
}

/// `part / whole`, defined as 0 when nothing started
fn rate(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
