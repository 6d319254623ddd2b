//! REST API module for HTTP endpoints
//!
//! - `GET/POST /api/tours`, `DELETE /api/tours/:id` - tour catalog
//! - `POST /api/events`, `GET /api/events/stats` - event ingestion
//! - `GET /api/analytics/*` - tour stats, step analytics, completion trend

pub mod analytics;
pub mod events;
pub mod tours;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AnalyticsError;

/// Error body shared by every endpoint: `{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// API error response
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

impl From<AnalyticsError> for ApiError {
    fn from(e: AnalyticsError) -> Self {
        match e {
            AnalyticsError::Validation(msg) => Self::bad_request(msg),
            AnalyticsError::NotFound(msg) => Self::not_found(msg),
            AnalyticsError::Timeout(_) => Self {
                status: StatusCode::GATEWAY_TIMEOUT,
                message: "Analytics query timed out".to_string(),
            },
            AnalyticsError::Storage(detail) => {
                tracing::error!(error = %detail, "Storage failure while serving request");
                Self::internal()
            }
        }
    }
}

/// Parse an optional RFC 3339 timestamp query parameter
pub fn parse_timestamp_param(
    name: &str,
    value: &Option<String>,
) -> Result<Option<DateTime<Utc>>, ApiError> {
    match value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        Some(ts) => DateTime::parse_from_rfc3339(ts)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| {
                ApiError::bad_request(format!(
                    "Invalid '{}' timestamp: {}. Use RFC 3339, e.g. 2024-01-31T00:00:00Z",
                    name, ts
                ))
            }),
        None => Ok(None),
    }
}

/// Require the `tourId` query parameter
pub fn require_tour_id(tour_id: &Option<String>) -> Result<&str, ApiError> {
    tour_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("Query parameter 'tourId' is required"))
}
