//! Derived analytics views
//!
//! None of these are stored. They are recomputed from the event log on every
//! query and serialized with the field names the dashboard expects.

use serde::{Deserialize, Serialize};

/// Completed and skipped tallies for one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepAnalytics {
    /// Label such as "Step 3"
    pub step: String,
    pub completed: u64,
    pub skipped: u64,
}

impl StepAnalytics {
    pub fn label(order: u32) -> String {
        format!("Step {}", order)
    }
}

/// Summary metrics for a tour
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourStats {
    pub total_tours_created: u64,
    pub total_tours_completed: u64,
    pub completion_rate: f64,
    pub steps_skipped: u64,
    pub average_duration_in_minutes: f64,
    pub active_tours_today: u64,
    pub abandon_rate: f64,
    /// Common denominator of both rates
    pub total_sessions_started: u64,
    pub total_tours_abandoned: u64,
}

/// Number of completions on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionTrend {
    /// ISO calendar date, `YYYY-MM-DD`
    pub day: String,
    pub completed: u64,
}
