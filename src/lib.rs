//! Tour Analytics
//!
//! Backend of the product tour dashboard: a tour catalog, an append-only
//! interaction event log and the analytics engine that turns those events
//! into the stats the dashboard renders.
//!
//! # Modules
//!
//! - `types`: Tour definitions, interaction events, derived views
//! - `catalog`: Tour storage and authoring rules
//! - `event_store`: Append-only event log (memory and JSONL)
//! - `analytics`: Session resolution, aggregation, trends, Stats API
//! - `api`: Axum REST endpoints
//! - `config`: Server CLI/env configuration
//! - `utils`: Atomic writes and calendar helpers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tour_analytics::analytics::{AnalyticsConfig, StatsService};
//! use tour_analytics::catalog::TourCatalog;
//! use tour_analytics::event_store::MemoryEventStore;
//! use tour_analytics::types::{NewTour, TimeRange};
//!
//! # async fn demo() -> tour_analytics::AnalyticsResult<()> {
//! let catalog = Arc::new(TourCatalog::in_memory());
//! let store = Arc::new(MemoryEventStore::new(catalog.clone()));
//! let tour = catalog.create(NewTour::with_steps("Onboarding", 5))?;
//!
//! let service = StatsService::new(catalog, store, AnalyticsConfig::default());
//! let stats = service.tour_stats(&tour.id, TimeRange::all_time()).await?;
//! assert_eq!(stats.total_tours_created, 1);
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod event_store;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use analytics::{AnalyticsConfig, StatsService};
pub use catalog::TourCatalog;
pub use error::{AnalyticsError, AnalyticsResult};
pub use event_store::{EventStore, FileEventStore, MemoryEventStore};
pub use types::{
    CompletionTrend, EventKind, InteractionEvent, StepAnalytics, TimeRange, TourDefinition,
    TourStats,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
