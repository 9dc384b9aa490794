//! Stop-sequence resolution via one representative ride per route.

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use tracing::{debug, info};

use crate::domain::{BusStop, RouteId, TimeWindow, join_ids, sort_stops};
use crate::stride::{
    GtfsRide, RideOrder, RideStopsQuery, RidesQuery, ScheduleSource, StrideError, stop_from_gtfs,
};

use super::config::EstimatorConfig;

/// Only the earliest ride in the window is sampled.
const REPRESENTATIVE_RIDE_LIMIT: u32 = 1;

/// Resolve the stops served by a set of routes around `timestamp`.
///
/// Routes are processed one after another. For each, the earliest ride
/// starting within the representative window is sampled and its stop visits
/// are resolved, fetching stop metadata concurrently. A route with no ride in
/// the window contributes nothing. The combined list is sorted by
/// `(stop_sequence, name)` across all routes.
pub async fn resolve_stops<S: ScheduleSource>(
    source: &S,
    config: &EstimatorConfig,
    route_ids: &[RouteId],
    timestamp: DateTime<Utc>,
) -> Result<Vec<BusStop>, StrideError> {
    info!(route_ids = %join_ids(route_ids), %timestamp, "looking up stops");

    let window = TimeWindow::around(timestamp, config.representative_window()).ok_or_else(|| {
        StrideError::InvalidRequest(format!("ride search window around {timestamp} is out of range"))
    })?;
    let mut stops = Vec::new();

    for &route_id in route_ids {
        let Some(ride) = representative_ride(source, route_id, window).await? else {
            debug!(%route_id, "no ride in window, skipping route");
            continue;
        };

        let ride_stops = stops_of_ride(source, &ride).await?;
        debug!(
            %route_id,
            ride_id = %ride.id,
            stops = ride_stops.len(),
            "resolved representative ride"
        );
        stops.extend(ride_stops);
    }

    sort_stops(&mut stops);

    info!(stops = stops.len(), "fetched stops");
    Ok(stops)
}

/// Earliest ride of `route_id` starting inside `window`, if any.
async fn representative_ride<S: ScheduleSource>(
    source: &S,
    route_id: RouteId,
    window: TimeWindow,
) -> Result<Option<GtfsRide>, StrideError> {
    let rides = source
        .list_rides(&RidesQuery {
            gtfs_route_id: Some(route_id),
            start_time: window,
            order_by: RideOrder::StartTimeAsc,
            limit: REPRESENTATIVE_RIDE_LIMIT,
        })
        .await?;

    Ok(rides.into_iter().next())
}

/// All stops visited by `ride`, in visit order.
///
/// Stop metadata lookups run concurrently; the first failure fails the
/// whole ride.
async fn stops_of_ride<S: ScheduleSource>(
    source: &S,
    ride: &GtfsRide,
) -> Result<Vec<BusStop>, StrideError> {
    let visits = source
        .list_ride_stops(&RideStopsQuery::for_rides([ride.id]))
        .await?;

    let lookups = visits.iter().map(|visit| async move {
        let stop = source.get_stop(visit.gtfs_stop_id).await?;
        Ok::<_, StrideError>(stop_from_gtfs(visit, &stop, ride)?)
    });

    try_join_all(lookups).await
}
