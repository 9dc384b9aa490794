//! Estimator configuration.

use chrono::Duration;

/// Default number of closest rides whose arrivals are reported.
pub const MAX_HITS_COUNT: usize = 16;

/// Query limits and search windows used by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimatorConfig {
    /// Page size for the route lookup.
    pub route_page_limit: u32,

    /// Half-width of the window searched for a representative ride (days).
    pub representative_window_days: i64,

    /// Half-width of the window searched for rides around the inferred
    /// start time (hours).
    pub arrival_window_hours: i64,

    /// Maximum rides fetched for ranking.
    pub arrival_ride_limit: u32,

    /// Number of closest rides kept after ranking.
    pub max_hits: usize,
}

impl EstimatorConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        route_page_limit: u32,
        representative_window_days: i64,
        arrival_window_hours: i64,
        arrival_ride_limit: u32,
        max_hits: usize,
    ) -> Self {
        Self {
            route_page_limit,
            representative_window_days,
            arrival_window_hours,
            arrival_ride_limit,
            max_hits,
        }
    }

    /// Set the number of closest rides kept.
    pub fn with_max_hits(mut self, max_hits: usize) -> Self {
        self.max_hits = max_hits;
        self
    }

    /// Returns the representative-ride search radius as a Duration.
    pub fn representative_window(&self) -> Duration {
        Duration::days(self.representative_window_days)
    }

    /// Returns the arrival search radius as a Duration.
    pub fn arrival_window(&self) -> Duration {
        Duration::hours(self.arrival_window_hours)
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            route_page_limit: 100,
            representative_window_days: 1,
            arrival_window_hours: 4,
            arrival_ride_limit: 1024,
            max_hits: MAX_HITS_COUNT,
        }
    }
}
