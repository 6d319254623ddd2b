//! Analytics endpoints consumed by the dashboard charts and stats card

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{parse_timestamp_param, require_tour_id, ApiError};
use crate::api::state::AppState;
use crate::types::{CompletionTrend, StepAnalytics, TimeRange, TourStats};

/// Trend window used when `days` is omitted
pub const DEFAULT_TREND_DAYS: u32 = 7;

/// Query parameters for tour-stats and step-analytics
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsParams {
    pub tour_id: Option<String>,
    /// Inclusive RFC 3339 start of the window
    pub from: Option<String>,
    /// Exclusive RFC 3339 end of the window
    pub to: Option<String>,
}

impl AnalyticsParams {
    fn time_range(&self) -> Result<TimeRange, ApiError> {
        let start = parse_timestamp_param("from", &self.from)?;
        let end = parse_timestamp_param("to", &self.to)?;
        Ok(TimeRange::new(start, end)?)
    }
}

/// Query parameters for completion-trend
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendParams {
    pub tour_id: Option<String>,
    pub days: Option<String>,
}

/// Response for GET /api/analytics/step-analytics
#[derive(Debug, Serialize)]
pub struct StepAnalyticsResponse {
    pub analytics: Vec<StepAnalytics>,
}

/// Response for GET /api/analytics/completion-trend
#[derive(Debug, Serialize)]
pub struct TrendResponse {
    pub trend: Vec<CompletionTrend>,
}

fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    params
        .map(|Query(p)| p)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// GET /api/analytics/tour-stats - Summary metrics of a tour
pub async fn tour_stats(
    State(state): State<Arc<AppState>>,
    params: Result<Query<AnalyticsParams>, QueryRejection>,
) -> Result<Json<TourStats>, ApiError> {
    let params = query_params(params)?;
    let tour_id = require_tour_id(&params.tour_id)?;
    let range = params.time_range()?;

    // All-time requests are answered from the recompute cache when it has the tour
    if range == TimeRange::all_time() && state.catalog.get(tour_id).is_some() {
        if let Some(cached) = state.cache.get(tour_id) {
            tracing::debug!(
                tour_id,
                computed_at = %cached.computed_at,
                "Serving cached tour stats"
            );
            return Ok(Json(cached.stats));
        }
    }

    Ok(Json(state.stats.tour_stats(tour_id, range).await?))
}

/// GET /api/analytics/step-analytics - Completed vs skipped per step
pub async fn step_analytics(
    State(state): State<Arc<AppState>>,
    params: Result<Query<AnalyticsParams>, QueryRejection>,
) -> Result<Json<StepAnalyticsResponse>, ApiError> {
    let params = query_params(params)?;
    let tour_id = require_tour_id(&params.tour_id)?;
    let range = params.time_range()?;

    let analytics = state.stats.step_analytics(tour_id, range).await?;
    Ok(Json(StepAnalyticsResponse { analytics }))
}

/// GET /api/analytics/completion-trend - Daily completions over `days`
pub async fn completion_trend(
    State(state): State<Arc<AppState>>,
    params: Result<Query<TrendParams>, QueryRejection>,
) -> Result<Json<TrendResponse>, ApiError> {
    let params = query_params(params)?;
    let tour_id = require_tour_id(&params.tour_id)?;

    let days = match params.days.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_TREND_DAYS,
        Some(raw) => raw.parse::<u32>().map_err(|_| {
            ApiError::bad_request(format!(
                "Invalid 'days' value '{}': expected a whole number >= 1",
                raw
            ))
        })?,
    };

    let trend = state.stats.completion_trend(tour_id, days).await?;
    Ok(Json(TrendResponse { trend }))
}
