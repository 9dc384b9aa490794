//! Domain types for the arrival estimator.
//!
//! These are the value objects the pipeline works with once raw schedule
//! records have been converted. They are built fresh for every query and
//! never cached.

mod ids;
mod route;
mod stop;
mod window;

pub use ids::{InvalidId, JOIN_SEPARATOR, RideId, RouteId, StopId, join_ids, parse_id_list};
pub use route::{BusRoute, RouteKey, RouteSet, split_long_name};
pub use stop::{BusStop, sort_stops, stop_order};
pub use window::TimeWindow;

#[cfg(test)]
pub(crate) use route::tests::route as test_route;
#[cfg(test)]
pub(crate) use stop::tests::stop as test_stop;
