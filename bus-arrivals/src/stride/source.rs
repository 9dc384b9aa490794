//! The read-only schedule queries the estimator depends on.

use std::fmt;
use std::future::Future;

use chrono::NaiveDate;

use crate::domain::{RideId, RouteId, StopId, TimeWindow, join_ids};

use super::error::StrideError;
use super::types::{GtfsRide, GtfsRideStop, GtfsRoute, GtfsStop};

/// Query for `/gtfs_routes/list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutesQuery {
    /// Public line number.
    pub route_short_name: String,
    /// Operator reference(s), comma-separated.
    pub operator_refs: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub limit: u32,
}

/// Sort order for ride searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RideOrder {
    StartTimeAsc,
    StartTimeDesc,
}

impl RideOrder {
    /// Value of the `order_by` query parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            RideOrder::StartTimeAsc => "start_time asc",
            RideOrder::StartTimeDesc => "start_time desc",
        }
    }
}

impl fmt::Display for RideOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Query for `/gtfs_rides/list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RidesQuery {
    pub gtfs_route_id: Option<RouteId>,
    /// Inclusive bounds on ride start time.
    pub start_time: TimeWindow,
    pub order_by: RideOrder,
    pub limit: u32,
}

/// Query for `/gtfs_ride_stops/list`.
///
/// Id sets are held already comma-joined, which is how the API takes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RideStopsQuery {
    pub gtfs_ride_ids: String,
    pub gtfs_stop_ids: Option<String>,
}

impl RideStopsQuery {
    /// All stop visits of the given rides.
    pub fn for_rides(rides: impl IntoIterator<Item = RideId>) -> Self {
        Self {
            gtfs_ride_ids: join_ids(rides),
            gtfs_stop_ids: None,
        }
    }

    /// Restrict the query to visits of the given stops.
    pub fn with_stops(mut self, stops: impl IntoIterator<Item = StopId>) -> Self {
        self.gtfs_stop_ids = Some(join_ids(stops));
        self
    }
}

/// Read-only access to the GTFS schedule.
///
/// This abstraction lets the estimator run against the live API, fixture
/// data, or a test double. Implementations must return results in the order
/// the query asks for and honour `limit`.
pub trait ScheduleSource: Send + Sync {
    /// Routes with a given line number and operator active in a date range.
    fn list_routes(
        &self,
        query: &RoutesQuery,
    ) -> impl Future<Output = Result<Vec<GtfsRoute>, StrideError>> + Send;

    /// Rides starting within a time window.
    fn list_rides(
        &self,
        query: &RidesQuery,
    ) -> impl Future<Output = Result<Vec<GtfsRide>, StrideError>> + Send;

    /// Stop visits for a set of rides, optionally restricted to some stops.
    fn list_ride_stops(
        &self,
        query: &RideStopsQuery,
    ) -> impl Future<Output = Result<Vec<GtfsRideStop>, StrideError>> + Send;

    /// Static metadata of one stop.
    fn get_stop(&self, id: StopId) -> impl Future<Output = Result<GtfsStop, StrideError>> + Send;
}
