//! Route resolution: from (operator, line number, date) to logical routes.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::{BusRoute, RouteSet};
use crate::stride::{RoutesQuery, ScheduleSource, StrideError, route_from_gtfs};

use super::config::EstimatorConfig;

/// Look up the logical routes of a line on the date of `timestamp`.
///
/// Raw entries sharing a [`RouteKey`](crate::domain::RouteKey) are merged:
/// the first entry seen supplies the display attributes and every entry
/// contributes its ids, in discovery order. Routes are returned in the order
/// their key was first seen.
pub async fn resolve_routes<S: ScheduleSource>(
    source: &S,
    config: &EstimatorConfig,
    timestamp: DateTime<Utc>,
    operator_id: &str,
    line_number: &str,
) -> Result<Vec<BusRoute>, StrideError> {
    info!(operator_id, line_number, %timestamp, "looking up routes");

    let date = timestamp.date_naive();
    let query = RoutesQuery {
        route_short_name: line_number.to_string(),
        operator_refs: operator_id.to_string(),
        date_from: date,
        date_to: date,
        limit: config.route_page_limit,
    };

    let raw = source.list_routes(&query).await?;
    let routes = merge_routes(raw.iter().map(route_from_gtfs));

    info!(raw = raw.len(), routes = routes.len(), "fetched routes");
    Ok(routes)
}

/// Fold single-id routes into logical routes by key, preserving discovery
/// order.
pub fn merge_routes(routes: impl IntoIterator<Item = BusRoute>) -> Vec<BusRoute> {
    routes.into_iter().collect::<RouteSet>().into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RouteId, RouteKey};
    use crate::estimator::test_source::{RecordingSource, Recorded, at, gtfs_route};
    use crate::stride::FixtureData;
    use chrono::NaiveDate;

    fn source(routes: Vec<crate::stride::GtfsRoute>) -> RecordingSource {
        RecordingSource::new(FixtureData {
            routes,
            ..FixtureData::default()
        })
    }

    #[tokio::test]
    async fn two_entries_sharing_a_key_merge_into_one_route() {
        let source = source(vec![
            gtfs_route(1001, 3, "Haifa<->Jerusalem-1#", "Egged"),
            gtfs_route(1002, 3, "Haifa<->Jerusalem-1#", "Egged (summer)"),
        ]);

        let routes = resolve_routes(&source, &EstimatorConfig::default(), at(9, 0, 0), "3", "480")
            .await
            .unwrap();

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].key, RouteKey::new("3", "Haifa<->Jerusalem-1#"));
        assert_eq!(routes[0].route_ids, vec![RouteId::new(1001), RouteId::new(1002)]);
        assert_eq!(routes[0].agency_name, "Egged");
        assert_eq!(routes[0].from_name, "Haifa");
        assert_eq!(routes[0].to_name, "Jerusalem");
    }

    #[tokio::test]
    async fn distinct_keys_keep_discovery_order() {
        let source = source(vec![
            gtfs_route(5, 3, "B<->A-2#", "Egged"),
            gtfs_route(6, 3, "A<->B-1#", "Egged"),
            gtfs_route(7, 3, "B<->A-2#", "Egged"),
        ]);

        let routes = resolve_routes(&source, &EstimatorConfig::default(), at(9, 0, 0), "3", "480")
            .await
            .unwrap();

        let keys: Vec<&str> = routes.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["3|B<->A-2#", "3|A<->B-1#"]);
        assert_eq!(routes[0].route_ids, vec![RouteId::new(5), RouteId::new(7)]);
    }

    #[tokio::test]
    async fn query_collapses_date_range_to_timestamp_date() {
        let source = source(vec![]);
        let config = EstimatorConfig::default();

        let routes = resolve_routes(&source, &config, at(23, 30, 0), "3", "480")
            .await
            .unwrap();
        assert!(routes.is_empty());

        let date = NaiveDate::from_ymd_opt(2023, 1, 10).unwrap();
        assert_eq!(
            source.calls(),
            vec![Recorded::Routes(RoutesQuery {
                route_short_name: "480".into(),
                operator_refs: "3".into(),
                date_from: date,
                date_to: date,
                limit: 100,
            })]
        );
    }

    #[test]
    fn merge_keeps_duplicate_ids() {
        let raw = [
            gtfs_route(9, 3, "A<->B-1#", "x"),
            gtfs_route(9, 3, "A<->B-1#", "x"),
        ];
        let merged = merge_routes(raw.iter().map(route_from_gtfs));
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].route_ids, vec![RouteId::new(9), RouteId::new(9)]);
    }

    #[test]
    fn merge_sums_id_counts() {
        let first = crate::domain::test_route("3", "A<->B-1#", "first", &[1, 2]);
        let second = crate::domain::test_route("3", "A<->B-1#", "second", &[3, 4, 5]);
        let merged = merge_routes([first, second]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].route_ids.len(), 5);
        assert_eq!(merged[0].agency_name, "first");
    }
}
