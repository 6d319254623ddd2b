//! Event ingestion endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use super::ApiError;
use crate::api::state::AppState;
use crate::event_store::EventLogStats;
use crate::types::{InteractionEvent, RecordedEvent};

/// Response for POST /api/events
#[derive(Debug, Serialize)]
pub struct RecordedResponse {
    pub event: RecordedEvent,
}

/// POST /api/events - Record one interaction event
pub async fn record_event(
    State(state): State<Arc<AppState>>,
    body: Result<Json<InteractionEvent>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(event) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let recorded = state.store.append_event(event).await?;
    tracing::debug!(
        sequence = recorded.sequence,
        tour_id = %recorded.event.tour_id,
        kind = %recorded.event.kind,
        "Event recorded"
    );
    Ok((StatusCode::CREATED, Json(RecordedResponse { event: recorded })))
}

/// GET /api/events/stats - Counters over the event log
pub async fn event_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<EventLogStats>, ApiError> {
    Ok(Json(state.store.stats().await?))
}
