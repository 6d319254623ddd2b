//! Data types for the tour analytics engine
//!
//! This module contains the tour definitions, interaction events and the
//! derived analytics views served to the dashboard.

mod analytics;
mod event;
mod tour;

pub use analytics::{CompletionTrend, StepAnalytics, TourStats};
pub use event::{EventKind, InteractionEvent, RecordedEvent, TimeRange};
pub use tour::{NewStep, NewTour, Step, TourDefinition};

/// Minimum number of steps a tour must have
pub const MIN_TOUR_STEPS: usize = 5;
