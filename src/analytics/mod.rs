//! Tour analytics engine
//!
//! ```text
//! EventStore ──query_events──► Aggregator ───► TourStats, StepAnalytics[]
//!                          └─► Trend ────────► CompletionTrend[]
//!                                     ▲
//!                    StatsService (tour check, read deadline, clock)
//! ```
//!
//! `aggregator` and `trend` are pure: `(events, config, now) -> view`.

pub mod aggregator;
pub mod clock;
pub mod config;
pub mod recompute;
pub mod service;
pub mod session;
pub mod trend;

pub use aggregator::{compute_step_analytics, compute_tour_stats};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AnalyticsConfig;
pub use recompute::{CachedStats, RecomputeJob, RecomputeSummary, StatsCache};
pub use service::StatsService;
pub use session::{classify_session, partition_sessions, SessionOutcome};
pub use trend::{completion_trend, trend_window, MAX_TREND_DAYS};
