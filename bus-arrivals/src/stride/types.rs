//! Stride API response DTOs.
//!
//! These types map directly to the Open Bus Stride GTFS JSON responses.
//! Most fields are `Option` because the API sends `null` for data it does
//! not have rather than omitting the record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{RideId, RouteId, StopId};

/// One raw route entry from `/gtfs_routes/list`.
///
/// Each entry is valid for one service date; the same line appears once per
/// date and per direction/alternative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GtfsRoute {
    pub id: RouteId,

    /// Service date this entry belongs to.
    pub date: Option<NaiveDate>,

    /// Stable line reference (shared by all dates of a line).
    pub line_ref: Option<i64>,

    /// Operator reference.
    pub operator_ref: Option<i64>,

    /// Public line number, e.g. "480".
    pub route_short_name: Option<String>,

    /// "Origin-City<->Destination-City-<direction><alternative>".
    pub route_long_name: Option<String>,

    /// Ministry of transport line code.
    pub route_mkt: Option<String>,

    pub route_direction: Option<String>,

    pub route_alternative: Option<String>,

    /// Operator display name.
    pub agency_name: Option<String>,

    pub route_type: Option<String>,
}

/// One ride from `/gtfs_rides/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GtfsRide {
    pub id: RideId,

    pub gtfs_route_id: Option<RouteId>,

    pub journey_ref: Option<String>,

    /// Scheduled departure from the first stop.
    pub start_time: Option<DateTime<Utc>>,

    /// Scheduled arrival at the last stop.
    pub end_time: Option<DateTime<Utc>>,
}

/// One stop visit from `/gtfs_ride_stops/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GtfsRideStop {
    pub id: i64,

    pub gtfs_stop_id: StopId,

    pub gtfs_ride_id: RideId,

    pub arrival_time: Option<DateTime<Utc>>,

    pub departure_time: Option<DateTime<Utc>>,

    /// Position of this visit within the ride.
    pub stop_sequence: Option<u32>,

    pub pickup_type: Option<i32>,

    pub drop_off_type: Option<i32>,

    pub shape_dist_traveled: Option<f64>,
}

/// Static stop metadata from `/gtfs_stops/get`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GtfsStop {
    pub id: StopId,

    pub date: Option<NaiveDate>,

    /// Public stop code (shown on the stop sign).
    pub code: Option<i64>,

    pub lat: Option<f64>,

    pub lon: Option<f64>,

    pub name: Option<String>,

    pub city: Option<String>,
}
