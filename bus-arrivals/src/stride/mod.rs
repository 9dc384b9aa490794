//! Open Bus Stride GTFS schedule source.
//!
//! This module provides the read-only queries the estimator runs against:
//! an HTTP client for the public Stride API, and a fixture-backed source
//! serving a recorded snapshot from disk.
//!
//! Key characteristics of Stride:
//! - A line has one route entry **per service date**, so the same line and
//!   direction comes back several times with different ids
//! - Ride and stop-visit timestamps are RFC 3339 with an offset
//! - Id-set filters are comma-separated strings

mod client;
mod convert;
mod error;
mod fixture;
mod source;
mod types;

pub use client::{DEFAULT_BASE_URL, StrideClient, StrideConfig};
pub use convert::{
    ConversionError, arrival_time, minutes_between, ride_start_time, route_from_gtfs,
    stop_from_gtfs,
};
pub use error::StrideError;
pub use fixture::{FixtureData, FixtureSource};
pub use source::{RideOrder, RideStopsQuery, RidesQuery, RoutesQuery, ScheduleSource};
pub use types::{GtfsRide, GtfsRideStop, GtfsRoute, GtfsStop};

use crate::domain::StopId;

/// The schedule source selected at startup.
#[derive(Debug, Clone)]
pub enum ScheduleBackend {
    /// Live Stride API.
    Stride(StrideClient),
    /// Recorded snapshot.
    Fixture(FixtureSource),
}

impl ScheduleSource for ScheduleBackend {
    async fn list_routes(&self, query: &RoutesQuery) -> Result<Vec<GtfsRoute>, StrideError> {
        match self {
            ScheduleBackend::Stride(client) => client.list_routes(query).await,
            ScheduleBackend::Fixture(fixture) => fixture.list_routes(query).await,
        }
    }

    async fn list_rides(&self, query: &RidesQuery) -> Result<Vec<GtfsRide>, StrideError> {
        match self {
            ScheduleBackend::Stride(client) => client.list_rides(query).await,
            ScheduleBackend::Fixture(fixture) => fixture.list_rides(query).await,
        }
    }

    async fn list_ride_stops(
        &self,
        query: &RideStopsQuery,
    ) -> Result<Vec<GtfsRideStop>, StrideError> {
        match self {
            ScheduleBackend::Stride(client) => client.list_ride_stops(query).await,
            ScheduleBackend::Fixture(fixture) => fixture.list_ride_stops(query).await,
        }
    }

    async fn get_stop(&self, id: StopId) -> Result<GtfsStop, StrideError> {
        match self {
            ScheduleBackend::Stride(client) => client.get_stop(id).await,
            ScheduleBackend::Fixture(fixture) => fixture.get_stop(id).await,
        }
    }
}
