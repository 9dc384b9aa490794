//! Conversion from Stride DTOs to domain types.

use chrono::{DateTime, Utc};

use crate::domain::{BusRoute, BusStop, RouteKey, split_long_name};

use super::types::{GtfsRide, GtfsRideStop, GtfsRoute, GtfsStop};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A ride stop points at a different ride than the one being converted
    #[error("ride stop belongs to ride {found}, expected {expected}")]
    RideMismatch { expected: i64, found: i64 },
}

/// Convert a raw route entry into a single-id logical route.
///
/// Missing display fields become empty strings; they never block the merge.
pub fn route_from_gtfs(route: &GtfsRoute) -> BusRoute {
    let operator_ref = route
        .operator_ref
        .map(|op| op.to_string())
        .unwrap_or_default();
    let long_name = route.route_long_name.clone().unwrap_or_default();
    let (from_name, to_name) = split_long_name(&long_name);

    BusRoute {
        key: RouteKey::new(&operator_ref, &long_name),
        line_number: route.route_short_name.clone().unwrap_or_default(),
        operator_ref,
        agency_name: route.agency_name.clone().unwrap_or_default(),
        from_name,
        to_name,
        direction: route.route_direction.clone().unwrap_or_default(),
        alternative: route.route_alternative.clone().unwrap_or_default(),
        route_ids: vec![route.id],
    }
}

/// Scheduled start of a ride.
pub fn ride_start_time(ride: &GtfsRide) -> Result<DateTime<Utc>, ConversionError> {
    ride.start_time
        .ok_or(ConversionError::MissingField("start_time"))
}

/// Arrival time of a stop visit.
pub fn arrival_time(visit: &GtfsRideStop) -> Result<DateTime<Utc>, ConversionError> {
    visit
        .arrival_time
        .ok_or(ConversionError::MissingField("arrival_time"))
}

/// Whole minutes from `start` to `arrival`, rounded down.
pub fn minutes_between(start: DateTime<Utc>, arrival: DateTime<Utc>) -> i64 {
    (arrival - start).num_seconds().div_euclid(60)
}

/// Build a [`BusStop`] from a visit on the representative ride and the
/// visited stop's static metadata.
pub fn stop_from_gtfs(
    visit: &GtfsRideStop,
    stop: &GtfsStop,
    ride: &GtfsRide,
) -> Result<BusStop, ConversionError> {
    if visit.gtfs_ride_id != ride.id {
        return Err(ConversionError::RideMismatch {
            expected: ride.id.get(),
            found: visit.gtfs_ride_id.get(),
        });
    }

    let route_id = ride
        .gtfs_route_id
        .ok_or(ConversionError::MissingField("gtfs_route_id"))?;
    let start = ride_start_time(ride)?;
    let arrival = arrival_time(visit)?;
    let stop_sequence = visit
        .stop_sequence
        .ok_or(ConversionError::MissingField("stop_sequence"))?;

    Ok(BusStop {
        stop_id: stop.id,
        route_id,
        name: stop.name.clone().unwrap_or_default(),
        code: stop.code,
        city: stop.city.clone().unwrap_or_default(),
        stop_sequence,
        minutes_from_route_start_time: minutes_between(start, arrival),
    })
}
