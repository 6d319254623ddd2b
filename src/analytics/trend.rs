//! Trend Calculator
//!
//! Buckets `tourCompleted` events by UTC calendar day over a window of `days`
//! ending today. Every day of the window appears, zero-count days included,
//! so the series can be plotted directly.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::types::{CompletionTrend, EventKind, InteractionEvent, TimeRange};
use crate::utils::{format_day, start_of_day};

/// Longest trend window, one leap year
pub const MAX_TREND_DAYS: u32 = 366;

/// First day and event window covering the `days` days ending on `today`
pub fn trend_window(days: u32, today: NaiveDate) -> AnalyticsResult<(NaiveDate, TimeRange)> {
    if days < 1 {
        return Err(AnalyticsError::Validation(
            "days must be at least 1".to_string(),
        ));
    }
    if days > MAX_TREND_DAYS {
        return Err(AnalyticsError::Validation(format!(
            "days must be at most {}, got {}",
            MAX_TREND_DAYS, days
        )));
    }

    let first_day = today
        .checked_sub_days(Days::new(u64::from(days) - 1))
        .ok_or_else(|| {
            AnalyticsError::Validation(format!("A {}-day trend window is out of range", days))
        })?;
    let end = today.checked_add_days(Days::new(1)).map(start_of_day);

    Ok((first_day, TimeRange::new(Some(start_of_day(first_day)), end)?))
}

/// Daily completion counts for the `days` days ending on `today`
pub fn completion_trend(
    events: &[InteractionEvent],
    days: u32,
    today: NaiveDate,
) -> AnalyticsResult<Vec<CompletionTrend>> {
    let (first_day, _) = trend_window(days, today)?;

    let mut per_day: HashMap<NaiveDate, u64> = HashMap::new();
    for event in events.iter().filter(|e| e.kind == EventKind::TourCompleted) {
        *per_day.entry(event.timestamp.date_naive()).or_insert(0) += 1;
    }

    Ok(first_day
        .iter_days()
        .take(days as usize)
        .map(|day| CompletionTrend {
            day: format_day(day),
            completed: per_day.get(&day).copied().unwrap_or(0),
        })
        .collect())
}
