//! Request and response types for the JSON API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{BusRoute, BusStop, RouteId, StopId};

/// Query for `GET /api/routes`.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutesParams {
    /// Operator reference, e.g. "3".
    pub operator: String,
    /// Line number, e.g. "480".
    pub line: String,
    /// RFC 3339 reference time.
    pub timestamp: String,
}

/// Query for `GET /api/stops`.
#[derive(Debug, Clone, Deserialize)]
pub struct StopsParams {
    /// Comma-separated raw route ids.
    pub route_ids: String,
    pub timestamp: String,
}

/// Query for `GET /api/arrivals`.
///
/// Carries the stop fields the estimator needs. `name` and `stop_sequence`
/// are not used for the estimate; they are echoed back in the response.
#[derive(Debug, Clone, Deserialize)]
pub struct ArrivalsParams {
    pub route_id: RouteId,
    pub stop_id: StopId,
    pub minutes_from_start: i64,
    pub timestamp: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub stop_sequence: Option<u32>,
}

impl ArrivalsParams {
    /// The stop this request asks about.
    pub fn stop(&self) -> BusStop {
        BusStop {
            stop_id: self.stop_id,
            route_id: self.route_id,
            name: self.name.clone().unwrap_or_default(),
            code: None,
            city: String::new(),
            stop_sequence: self.stop_sequence.unwrap_or_default(),
            minutes_from_route_start_time: self.minutes_from_start,
        }
    }
}

/// A logical route in API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDto {
    pub key: String,
    pub line_number: String,
    pub operator_ref: String,
    pub agency_name: String,
    pub from_name: String,
    pub to_name: String,
    pub direction: String,
    pub alternative: String,
    pub route_ids: Vec<RouteId>,
}

impl From<BusRoute> for RouteDto {
    fn from(route: BusRoute) -> Self {
        Self {
            key: route.key.to_string(),
            line_number: route.line_number,
            operator_ref: route.operator_ref,
            agency_name: route.agency_name,
            from_name: route.from_name,
            to_name: route.to_name,
            direction: route.direction,
            alternative: route.alternative,
            route_ids: route.route_ids,
        }
    }
}

/// Response for `GET /api/routes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesResponse {
    pub routes: Vec<RouteDto>,
}

/// A stop in API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopDto {
    pub stop_id: StopId,
    pub route_id: RouteId,
    pub name: String,
    pub code: Option<i64>,
    pub city: String,
    pub stop_sequence: u32,
    pub minutes_from_route_start_time: i64,
}

impl From<BusStop> for StopDto {
    fn from(stop: BusStop) -> Self {
        Self {
            stop_id: stop.stop_id,
            route_id: stop.route_id,
            name: stop.name,
            code: stop.code,
            city: stop.city,
            stop_sequence: stop.stop_sequence,
            minutes_from_route_start_time: stop.minutes_from_route_start_time,
        }
    }
}

/// Response for `GET /api/stops`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopsResponse {
    pub stops: Vec<StopDto>,
}

/// Response for `GET /api/arrivals`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrivalsResponse {
    pub stop_id: StopId,
    pub route_id: RouteId,
    pub name: Option<String>,
    pub stop_sequence: Option<u32>,
    /// Inferred start time of a ride reaching the stop at the reference time.
    pub target_start_time: DateTime<Utc>,
    /// Scheduled arrivals, earliest first.
    pub arrival_times: Vec<DateTime<Utc>>,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
