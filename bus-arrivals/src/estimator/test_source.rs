//! In-memory schedule source for estimator tests.
//!
//! Wraps a [`FixtureSource`] and records every query it receives, so tests
//! can assert on the exact windows, limits and call order the pipeline uses.

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::domain::{RideId, RouteId, StopId};
use crate::stride::{
    FixtureData, FixtureSource, GtfsRide, GtfsRideStop, GtfsRoute, GtfsStop, RideStopsQuery,
    RidesQuery, RoutesQuery, ScheduleSource, StrideError,
};

/// One query seen by the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Routes(RoutesQuery),
    Rides(RidesQuery),
    RideStops(RideStopsQuery),
    Stop(StopId),
}

pub struct RecordingSource {
    inner: FixtureSource,
    log: Mutex<Vec<Recorded>>,
    failing_stops: HashSet<StopId>,
}

impl RecordingSource {
    pub fn new(data: FixtureData) -> Self {
        Self {
            inner: FixtureSource::from_data(data),
            log: Mutex::new(Vec::new()),
            failing_stops: HashSet::new(),
        }
    }

    /// Make `get_stop` fail with an API error for this stop.
    pub fn fail_stop(mut self, id: StopId) -> Self {
        self.failing_stops.insert(id);
        self
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn rides_queries(&self) -> Vec<RidesQuery> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Recorded::Rides(q) => Some(q),
                _ => None,
            })
            .collect()
    }

    pub fn ride_stops_queries(&self) -> Vec<RideStopsQuery> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Recorded::RideStops(q) => Some(q),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Recorded) {
        self.log.lock().unwrap().push(call);
    }
}

impl ScheduleSource for RecordingSource {
    async fn list_routes(&self, query: &RoutesQuery) -> Result<Vec<GtfsRoute>, StrideError> {
        self.record(Recorded::Routes(query.clone()));
        self.inner.list_routes(query).await
    }

    async fn list_rides(&self, query: &RidesQuery) -> Result<Vec<GtfsRide>, StrideError> {
        self.record(Recorded::Rides(query.clone()));
        self.inner.list_rides(query).await
    }

    async fn list_ride_stops(
        &self,
        query: &RideStopsQuery,
    ) -> Result<Vec<GtfsRideStop>, StrideError> {
        self.record(Recorded::RideStops(query.clone()));
        self.inner.list_ride_stops(query).await
    }

    async fn get_stop(&self, id: StopId) -> Result<GtfsStop, StrideError> {
        self.record(Recorded::Stop(id));
        if self.failing_stops.contains(&id) {
            return Err(StrideError::Api {
                status: 503,
                message: format!("stop {id} unavailable"),
            });
        }
        self.inner.get_stop(id).await
    }
}

pub fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 10, h, m, s).unwrap()
}

pub fn gtfs_route(id: i64, operator: i64, long_name: &str, agency: &str) -> GtfsRoute {
    GtfsRoute {
        id: RouteId::new(id),
        date: NaiveDate::from_ymd_opt(2023, 1, 10),
        line_ref: Some(7020),
        operator_ref: Some(operator),
        route_short_name: Some("480".into()),
        route_long_name: Some(long_name.into()),
        route_mkt: None,
        route_direction: Some("1".into()),
        route_alternative: Some("#".into()),
        agency_name: Some(agency.into()),
        route_type: Some("3".into()),
    }
}

pub fn gtfs_ride(id: i64, route: i64, start: DateTime<Utc>) -> GtfsRide {
    GtfsRide {
        id: RideId::new(id),
        gtfs_route_id: Some(RouteId::new(route)),
        journey_ref: None,
        start_time: Some(start),
        end_time: None,
    }
}

pub fn visit(id: i64, stop: i64, ride: i64, seq: u32, arrival: DateTime<Utc>) -> GtfsRideStop {
    GtfsRideStop {
        id,
        gtfs_stop_id: StopId::new(stop),
        gtfs_ride_id: RideId::new(ride),
        arrival_time: Some(arrival),
        departure_time: Some(arrival),
        stop_sequence: Some(seq),
        pickup_type: None,
        drop_off_type: None,
        shape_dist_traveled: None,
    }
}

pub fn gtfs_stop(id: i64, name: &str) -> GtfsStop {
    GtfsStop {
        id: StopId::new(id),
        date: None,
        code: Some(id * 10),
        lat: None,
        lon: None,
        name: Some(name.into()),
        city: Some("Haifa".into()),
    }
}
