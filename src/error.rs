//! Error taxonomy shared by the catalog, event store and analytics engine

use std::time::Duration;

use thiserror::Error;

/// Result type for engine operations
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Errors that can occur while recording events or computing analytics
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// Malformed input: bad time window, `days < 1`, missing fields
    #[error("{0}")]
    Validation(String),

    /// Unknown tour
    #[error("{0}")]
    NotFound(String),

    /// An event store read exceeded its deadline
    #[error("Event store read timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Event store or catalog unavailable or corrupt
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AnalyticsError {
    pub fn tour_not_found(tour_id: &str) -> Self {
        Self::NotFound(format!("Tour '{}' not found", tour_id))
    }
}

impl From<std::io::Error> for AnalyticsError {
    fn from(e: std::io::Error) -> Self {
        AnalyticsError::Storage(format!("IO error: {}", e))
    }
}

impl From<serde_json::Error> for AnalyticsError {
    fn from(e: serde_json::Error) -> Self {
        AnalyticsError::Storage(format!("JSON error: {}", e))
    }
}
