//! Engine configuration

use std::time::Duration as StdDuration;

use chrono::Duration;

/// Default inactivity window after which a started session counts as abandoned
pub const DEFAULT_INACTIVITY_HOURS: i64 = 24;

/// Default deadline for a single event store read
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 5_000;

/// Knobs of the analytics engine
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// A started session with no terminal event whose last event is older
    /// than this is implicitly abandoned
    pub inactivity_threshold: Duration,
    /// Deadline for each event store read
    pub read_timeout: StdDuration,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            inactivity_threshold: Duration::hours(DEFAULT_INACTIVITY_HOURS),
            read_timeout: StdDuration::from_millis(DEFAULT_READ_TIMEOUT_MS),
        }
    }
}

impl AnalyticsConfig {
    pub fn with_inactivity_threshold(mut self, threshold: Duration) -> Self {
        self.inactivity_threshold = threshold;
        self
    }

    pub fn with_read_timeout(mut self, timeout: StdDuration) -> Self {
        self.read_timeout = timeout;
        self
    }
}
