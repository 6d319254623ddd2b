//! Tour catalog endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use super::ApiError;
use crate::api::state::AppState;
use crate::types::{NewTour, TourDefinition};

/// Response for GET /api/tours
#[derive(Debug, Serialize)]
pub struct ToursResponse {
    pub tours: Vec<TourDefinition>,
}

/// Response for POST /api/tours
#[derive(Debug, Serialize)]
pub struct TourResponse {
    pub tour: TourDefinition,
}

/// Response for DELETE /api/tours/:id
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// GET /api/tours - List all tours
pub async fn list_tours(State(state): State<Arc<AppState>>) -> Json<ToursResponse> {
    Json(ToursResponse {
        tours: state.catalog.list(),
    })
}

/// POST /api/tours - Create a tour with at least 5 steps
pub async fn create_tour(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewTour>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let tour = state.catalog.create(request)?;
    Ok((StatusCode::CREATED, Json(TourResponse { tour })))
}

/// DELETE /api/tours/:id - Delete a tour
pub async fn delete_tour(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.catalog.delete(&id)?;
    state.cache.remove(&id);
    Ok(Json(DeleteResponse { success: true }))
}
