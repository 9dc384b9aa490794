//! Arrival-time estimation pipeline.
//!
//! This module correlates static schedule data with a reference moment in
//! three stages:
//!
//! 1. [`resolve_routes`]: line number + operator + date to logical routes
//! 2. [`resolve_stops`]: route ids to the ordered stops of a sampled ride
//! 3. [`estimate_arrival_times`]: one stop + reference moment to the
//!    scheduled arrivals of the rides closest to that moment
//!
//! Each stage is an independent query over a [`ScheduleSource`]; nothing is
//! shared or cached between calls.

mod arrivals;
mod config;
mod routes;
mod stops;

#[cfg(test)]
mod test_source;

pub use arrivals::{arrival_search_window, closest_rides, estimate_arrival_times, target_start_time};
pub use config::{EstimatorConfig, MAX_HITS_COUNT};
pub use routes::{merge_routes, resolve_routes};
pub use stops::resolve_stops;

use chrono::{DateTime, Utc};

use crate::domain::{BusRoute, BusStop, RouteId};
use crate::stride::{ScheduleSource, StrideError};

/// The three pipeline stages bound to one source and configuration.
pub struct Estimator<'a, S: ScheduleSource> {
    source: &'a S,
    config: &'a EstimatorConfig,
}

impl<'a, S: ScheduleSource> Estimator<'a, S> {
    /// Create a new estimator.
    pub fn new(source: &'a S, config: &'a EstimatorConfig) -> Self {
        Self { source, config }
    }

    /// See [`resolve_routes`].
    pub async fn routes(
        &self,
        timestamp: DateTime<Utc>,
        operator_id: &str,
        line_number: &str,
    ) -> Result<Vec<BusRoute>, StrideError> {
        resolve_routes(self.source, self.config, timestamp, operator_id, line_number).await
    }

    /// See [`resolve_stops`].
    pub async fn stops(
        &self,
        route_ids: &[RouteId],
        timestamp: DateTime<Utc>,
    ) -> Result<Vec<BusStop>, StrideError> {
        resolve_stops(self.source, self.config, route_ids, timestamp).await
    }

    /// See [`estimate_arrival_times`].
    pub async fn arrival_times(
        &self,
        stop: &BusStop,
        timestamp: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, StrideError> {
        estimate_arrival_times(self.source, self.config, stop, timestamp).await
    }
}
