//! Fixture-backed schedule source for running without API access.
//!
//! Loads a recorded schedule snapshot from one JSON file and answers the
//! same queries as the live API, with the same filtering, ordering and
//! limit rules.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::domain::{JOIN_SEPARATOR, StopId};

use super::error::StrideError;
use super::source::{RideOrder, RideStopsQuery, RidesQuery, RoutesQuery, ScheduleSource};
use super::types::{GtfsRide, GtfsRideStop, GtfsRoute, GtfsStop};

/// On-disk fixture layout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FixtureData {
    #[serde(default)]
    pub routes: Vec<GtfsRoute>,
    #[serde(default)]
    pub rides: Vec<GtfsRide>,
    #[serde(default)]
    pub ride_stops: Vec<GtfsRideStop>,
    #[serde(default)]
    pub stops: Vec<GtfsStop>,
}

/// Schedule source that serves data from a fixture file.
///
/// Useful for development and for tests that need the whole pipeline
/// without network access.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    data: Arc<FixtureData>,
    stops_by_id: Arc<HashMap<StopId, GtfsStop>>,
}

impl FixtureSource {
    /// Load fixture data from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StrideError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| StrideError::Fixture(format!("failed to read {}: {e}", path.display())))?;

        let data: FixtureData = serde_json::from_str(&json)
            .map_err(|e| StrideError::Fixture(format!("failed to parse {}: {e}", path.display())))?;

        info!(
            path = %path.display(),
            routes = data.routes.len(),
            rides = data.rides.len(),
            ride_stops = data.ride_stops.len(),
            stops = data.stops.len(),
            "loaded schedule fixture"
        );

        Ok(Self::from_data(data))
    }

    /// Build a source from in-memory data.
    pub fn from_data(data: FixtureData) -> Self {
        let stops_by_id = data.stops.iter().map(|s| (s.id, s.clone())).collect();
        Self {
            data: Arc::new(data),
            stops_by_id: Arc::new(stops_by_id),
        }
    }
}

/// Parse a comma-joined id filter into a set of raw ids.
fn id_filter(joined: &str) -> Result<HashSet<i64>, StrideError> {
    joined
        .split(JOIN_SEPARATOR)
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.trim().parse::<i64>().map_err(|_| StrideError::Api {
                status: 422,
                message: format!("invalid id in filter: {s:?}"),
            })
        })
        .collect()
}

fn limit(len: usize, limit: u32) -> usize {
    len.min(limit as usize)
}

impl ScheduleSource for FixtureSource {
    async fn list_routes(&self, query: &RoutesQuery) -> Result<Vec<GtfsRoute>, StrideError> {
        let operators = id_filter(&query.operator_refs)?;

        let mut routes: Vec<GtfsRoute> = self
            .data
            .routes
            .iter()
            .filter(|r| r.route_short_name.as_deref() == Some(query.route_short_name.as_str()))
            .filter(|r| operators.is_empty() || r.operator_ref.is_some_and(|op| operators.contains(&op)))
            .filter(|r| {
                r.date
                    .is_some_and(|d| query.date_from <= d && d <= query.date_to)
            })
            .cloned()
            .collect();

        routes.truncate(limit(routes.len(), query.limit));
        Ok(routes)
    }

    async fn list_rides(&self, query: &RidesQuery) -> Result<Vec<GtfsRide>, StrideError> {
        let mut rides: Vec<GtfsRide> = self
            .data
            .rides
            .iter()
            .filter(|r| query.gtfs_route_id.is_none() || r.gtfs_route_id == query.gtfs_route_id)
            .filter(|r| r.start_time.is_some_and(|t| query.start_time.contains(t)))
            .cloned()
            .collect();

        match query.order_by {
            RideOrder::StartTimeAsc => rides.sort_by_key(|r| r.start_time),
            RideOrder::StartTimeDesc => rides.sort_by(|a, b| b.start_time.cmp(&a.start_time)),
        }

        rides.truncate(limit(rides.len(), query.limit));
        Ok(rides)
    }

    async fn list_ride_stops(
        &self,
        query: &RideStopsQuery,
    ) -> Result<Vec<GtfsRideStop>, StrideError> {
        let rides = id_filter(&query.gtfs_ride_ids)?;
        let stops = match &query.gtfs_stop_ids {
            Some(ids) => Some(id_filter(ids)?),
            None => None,
        };

        let mut visits: Vec<GtfsRideStop> = self
            .data
            .ride_stops
            .iter()
            .filter(|v| rides.contains(&v.gtfs_ride_id.get()))
            .filter(|v| {
                stops
                    .as_ref()
                    .is_none_or(|s| s.contains(&v.gtfs_stop_id.get()))
            })
            .cloned()
            .collect();

        visits.sort_by_key(|v| (v.gtfs_ride_id, v.stop_sequence));
        Ok(visits)
    }

    async fn get_stop(&self, id: StopId) -> Result<GtfsStop, StrideError> {
        self.stops_by_id
            .get(&id)
            .cloned()
            .ok_or_else(|| StrideError::NotFound(format!("stop {id}")))
    }
}
