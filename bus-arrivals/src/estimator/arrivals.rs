//! Arrival-time estimation for a single stop.
//!
//! Given a stop and a reference moment, infer when a ride serving the stop at
//! that moment must have started, search rides around that start time, keep
//! the ones closest to the reference moment and report their scheduled
//! arrivals at the stop.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::{BusStop, RideId, TimeWindow};
use crate::stride::{
    ConversionError, GtfsRide, RideOrder, RideStopsQuery, RidesQuery, ScheduleSource, StrideError,
    arrival_time, ride_start_time,
};

use super::config::EstimatorConfig;

/// Start time of a ride that reaches `stop` at `timestamp`.
///
/// Fails with [`StrideError::InvalidRequest`] when the stop's offset moves
/// the start time outside the representable range.
pub fn target_start_time(
    stop: &BusStop,
    timestamp: DateTime<Utc>,
) -> Result<DateTime<Utc>, StrideError> {
    stop.offset_from_route_start()
        .and_then(|offset| timestamp.checked_sub_signed(offset))
        .ok_or_else(|| {
            StrideError::InvalidRequest(format!(
                "{} minutes from route start is out of range for {timestamp}",
                stop.minutes_from_route_start_time
            ))
        })
}

/// Window of ride start times searched around `target_start`.
pub fn arrival_search_window(
    target_start: DateTime<Utc>,
    config: &EstimatorConfig,
) -> Result<TimeWindow, StrideError> {
    TimeWindow::around(target_start, config.arrival_window()).ok_or_else(|| {
        StrideError::InvalidRequest(format!("search window around {target_start} is out of range"))
    })
}

/// Rank rides by how far their start time is from `reference`, in whole
/// seconds, and keep the `max_hits` closest.
///
/// The sort is stable: rides at the same distance keep their input order.
pub fn closest_rides(
    rides: &[GtfsRide],
    reference: DateTime<Utc>,
    max_hits: usize,
) -> Result<Vec<RideId>, ConversionError> {
    let mut ranked = rides
        .iter()
        .map(|ride| {
            let start = ride_start_time(ride)?;
            Ok(((reference - start).num_seconds().abs(), ride.id))
        })
        .collect::<Result<Vec<(i64, RideId)>, ConversionError>>()?;

    ranked.sort_by_key(|&(distance, _)| distance);
    ranked.truncate(max_hits);

    Ok(ranked.into_iter().map(|(_, id)| id).collect())
}

/// Scheduled arrival times at `stop` of the rides closest to `timestamp`,
/// in chronological order.
///
/// Returns an empty list when no ride of the stop's route starts inside the
/// search window.
pub async fn estimate_arrival_times<S: ScheduleSource>(
    source: &S,
    config: &EstimatorConfig,
    stop: &BusStop,
    timestamp: DateTime<Utc>,
) -> Result<Vec<DateTime<Utc>>, StrideError> {
    let target_start = target_start_time(stop, timestamp)?;
    info!(
        stop_id = %stop.stop_id,
        minutes = stop.minutes_from_route_start_time,
        %target_start,
        "looking for rides starting around time"
    );

    let rides = source
        .list_rides(&RidesQuery {
            gtfs_route_id: Some(stop.route_id),
            start_time: arrival_search_window(target_start, config)?,
            order_by: RideOrder::StartTimeAsc,
            limit: config.arrival_ride_limit,
        })
        .await?;

    if rides.is_empty() {
        debug!(route_id = %stop.route_id, "no rides in window");
        return Ok(Vec::new());
    }

    // The window is centred on `target_start` but distance is measured from
    // `timestamp`. Keep it that way until the intended reference is confirmed.
    let closest = closest_rides(&rides, timestamp, config.max_hits)?;
    if closest.is_empty() {
        return Ok(Vec::new());
    }

    let hits = source
        .list_ride_stops(&RideStopsQuery::for_rides(closest.iter().copied()).with_stops([stop.stop_id]))
        .await?;

    let mut times = hits
        .iter()
        .map(arrival_time)
        .collect::<Result<Vec<_>, _>>()?;
    times.sort();

    info!(
        rides = rides.len(),
        ranked = closest.len(),
        hits = times.len(),
        "fetched stop hit times"
    );
    Ok(times)
}
