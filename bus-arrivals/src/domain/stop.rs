//! Bus stops as seen along a route.

use std::cmp::Ordering;

use chrono::Duration;

use super::{RouteId, StopId};

/// A stop visited by a route, with its scheduled offset from the start of the
/// ride it was sampled from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusStop {
    pub stop_id: StopId,
    /// Raw route id of the ride this stop was sampled from.
    pub route_id: RouteId,
    pub name: String,
    /// Public stop code, if the source has one.
    pub code: Option<i64>,
    pub city: String,
    /// Position of the stop within its ride (1-based in GTFS).
    pub stop_sequence: u32,
    /// Scheduled minutes between ride start and arrival at this stop.
    pub minutes_from_route_start_time: i64,
}

impl BusStop {
    /// Scheduled offset from ride start as a `Duration`, or `None` if the
    /// minute count does not fit one.
    pub fn offset_from_route_start(&self) -> Option<Duration> {
        Duration::try_minutes(self.minutes_from_route_start_time)
    }
}

/// Total order over resolved stops: stop sequence, then name.
pub fn stop_order(a: &BusStop, b: &BusStop) -> Ordering {
    a.stop_sequence
        .cmp(&b.stop_sequence)
        .then_with(|| a.name.cmp(&b.name))
}

/// Sort stops by [`stop_order`]. The sort is stable, so stops equal in both
/// sequence and name keep their accumulation order.
pub fn sort_stops(stops: &mut [BusStop]) {
    stops.sort_by(stop_order);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn stop(id: i64, route: i64, name: &str, seq: u32, mins: i64) -> BusStop {
        BusStop {
            stop_id: StopId::new(id),
            route_id: RouteId::new(route),
            name: name.to_string(),
            code: None,
            city: String::new(),
            stop_sequence: seq,
            minutes_from_route_start_time: mins,
        }
    }

    #[test]
    fn orders_by_sequence_first() {
        let mut stops = vec![
            stop(1, 1, "Alpha", 3, 10),
            stop(2, 1, "Zulu", 1, 0),
            stop(3, 1, "Mike", 2, 5),
        ];
        sort_stops(&mut stops);
        let seqs: Vec<u32> = stops.iter().map(|s| s.stop_sequence).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
    }

    #[test]
    fn equal_sequence_orders_by_name() {
        let mut stops = vec![
            stop(1, 1, "Central", 2, 4),
            stop(2, 2, "Bridge", 2, 6),
            stop(3, 1, "Arlozorov", 1, 0),
        ];
        sort_stops(&mut stops);
        let names: Vec<&str> = stops.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Arlozorov", "Bridge", "Central"]);
    }

    #[test]
    fn full_ties_keep_input_order() {
        let mut stops = vec![stop(1, 1, "Same", 1, 0), stop(2, 2, "Same", 1, 0)];
        sort_stops(&mut stops);
        assert_eq!(stops[0].stop_id, StopId::new(1));
        assert_eq!(stops[1].stop_id, StopId::new(2));
    }

    #[test]
    fn offset_duration() {
        assert_eq!(
            stop(1, 1, "A", 1, 15).offset_from_route_start(),
            Some(Duration::minutes(15))
        );
        assert_eq!(stop(1, 1, "A", 1, i64::MAX).offset_from_route_start(), None);
    }
}

#[cfg(test)]
mod proptests {
    use super::tests::stop;
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// After sorting, every adjacent pair respects (sequence, name).
        #[test]
        fn sorted_pairs_are_ordered(raw in proptest::collection::vec((1u32..6, "[a-d]{1,2}"), 0..25)) {
            let mut stops: Vec<BusStop> = raw
                .iter()
                .enumerate()
                .map(|(i, (seq, name))| stop(i as i64 + 1, 1, name, *seq, 0))
                .collect();
            sort_stops(&mut stops);

            for pair in stops.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(a.stop_sequence <= b.stop_sequence);
                if a.stop_sequence == b.stop_sequence {
                    prop_assert!(a.name <= b.name);
                }
            }
        }
    }
}
