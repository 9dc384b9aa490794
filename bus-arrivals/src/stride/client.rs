//! Stride GTFS HTTP client.
//!
//! Provides async methods for querying the Open Bus Stride API. Handles
//! request limiting, status mapping and decoding into DTOs.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::StopId;

use super::error::StrideError;
use super::source::{RideStopsQuery, RidesQuery, RoutesQuery, ScheduleSource};
use super::types::{GtfsRide, GtfsRideStop, GtfsRoute, GtfsStop};

/// Default base URL for the Stride API.
pub const DEFAULT_BASE_URL: &str = "https://open-bus-stride-api.hasadna.org.il";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How much of an undecodable body to keep in the error.
const ERROR_BODY_CHARS: usize = 500;

/// Configuration for the Stride client.
#[derive(Debug, Clone)]
pub struct StrideConfig {
    /// Base URL for the API (defaults to production Stride)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl StrideConfig {
    /// Create a config pointing at the production API.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing or a mirror).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for StrideConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Stride API client.
///
/// Cheap to clone; clones share the HTTP connection pool and the request
/// semaphore.
#[derive(Debug, Clone)]
pub struct StrideClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl StrideClient {
    /// Create a new client with the given configuration.
    pub fn new(config: StrideConfig) -> Result<Self, StrideError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` with `query` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, StrideError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| StrideError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "stride request");

        let response = self.http.get(&url).query(query).send().await?;

        let status = response.status();
        debug!(%url, status = status.as_u16(), "stride response");

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StrideError::NotFound(path.to_string()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(StrideError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StrideError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        // The API answers `null` for ids it does not know
        if body.is_empty() || body == "null" {
            return Err(StrideError::NotFound(path.to_string()));
        }

        serde_json::from_str(&body).map_err(|e| StrideError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(ERROR_BODY_CHARS).collect()),
        })
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn format_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Query parameters for `/gtfs_routes/list`.
fn routes_params(query: &RoutesQuery) -> Vec<(&'static str, String)> {
    vec![
        ("route_short_name", query.route_short_name.clone()),
        ("operator_refs", query.operator_refs.clone()),
        ("date_from", format_date(query.date_from)),
        ("date_to", format_date(query.date_to)),
        ("limit", query.limit.to_string()),
    ]
}

/// Query parameters for `/gtfs_rides/list`.
fn rides_params(query: &RidesQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(5);
    if let Some(route_id) = query.gtfs_route_id {
        params.push(("gtfs_route_id", route_id.to_string()));
    }
    params.push(("start_time_from", format_timestamp(query.start_time.from)));
    params.push(("start_time_to", format_timestamp(query.start_time.to)));
    params.push(("order_by", query.order_by.as_param().to_string()));
    params.push(("limit", query.limit.to_string()));
    params
}

/// Query parameters for `/gtfs_ride_stops/list`.
fn ride_stops_params(query: &RideStopsQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("gtfs_ride_ids", query.gtfs_ride_ids.clone())];
    if let Some(stop_ids) = &query.gtfs_stop_ids {
        params.push(("gtfs_stop_ids", stop_ids.clone()));
    }
    params
}

impl ScheduleSource for StrideClient {
    async fn list_routes(&self, query: &RoutesQuery) -> Result<Vec<GtfsRoute>, StrideError> {
        self.get_json("/gtfs_routes/list", &routes_params(query)).await
    }

    async fn list_rides(&self, query: &RidesQuery) -> Result<Vec<GtfsRide>, StrideError> {
        self.get_json("/gtfs_rides/list", &rides_params(query)).await
    }

    async fn list_ride_stops(
        &self,
        query: &RideStopsQuery,
    ) -> Result<Vec<GtfsRideStop>, StrideError> {
        self.get_json("/gtfs_ride_stops/list", &ride_stops_params(query))
            .await
    }

    async fn get_stop(&self, id: StopId) -> Result<GtfsStop, StrideError> {
        self.get_json("/gtfs_stops/get", &[("id", id.to_string())])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RideId, RouteId, TimeWindow};
    use crate::stride::source::RideOrder;
    use chrono::{Duration, TimeZone};

    #[test]
    fn config_builder() {
        let config = StrideConfig::new()
            .with_base_url("http://localhost:8080")
            .with_max_concurrent(2)
            .with_timeout(60);

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.max_concurrent, 2);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn config_defaults() {
        let config = StrideConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn client_creation_trims_trailing_slash() {
        let client = StrideClient::new(StrideConfig::new().with_base_url("http://x/")).unwrap();
        assert_eq!(client.base_url(), "http://x");
    }

    #[test]
    fn routes_query_params() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 10).unwrap();
        let params = routes_params(&RoutesQuery {
            route_short_name: "480".into(),
            operator_refs: "3".into(),
            date_from: date,
            date_to: date,
            limit: 100,
        });
        assert_eq!(
            params,
            vec![
                ("route_short_name", "480".to_string()),
                ("operator_refs", "3".to_string()),
                ("date_from", "2023-01-10".to_string()),
                ("date_to", "2023-01-10".to_string()),
                ("limit", "100".to_string()),
            ]
        );
    }

    #[test]
    fn rides_query_params() {
        let center = Utc.with_ymd_and_hms(2023, 1, 10, 8, 45, 0).unwrap();
        let params = rides_params(&RidesQuery {
            gtfs_route_id: Some(RouteId::new(17)),
            start_time: TimeWindow::around(center, Duration::hours(4)).unwrap(),
            order_by: RideOrder::StartTimeAsc,
            limit: 1024,
        });
        assert_eq!(
            params,
            vec![
                ("gtfs_route_id", "17".to_string()),
                ("start_time_from", "2023-01-10T04:45:00Z".to_string()),
                ("start_time_to", "2023-01-10T12:45:00Z".to_string()),
                ("order_by", "start_time asc".to_string()),
                ("limit", "1024".to_string()),
            ]
        );
    }

    #[test]
    fn rides_query_without_route() {
        let center = Utc.with_ymd_and_hms(2023, 1, 10, 9, 0, 0).unwrap();
        let params = rides_params(&RidesQuery {
            gtfs_route_id: None,
            start_time: TimeWindow::around(center, Duration::days(1)).unwrap(),
            order_by: RideOrder::StartTimeDesc,
            limit: 1,
        });
        assert_eq!(params[0].0, "start_time_from");
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn ride_stops_query_params() {
        let query = RideStopsQuery::for_rides([RideId::new(1), RideId::new(2)])
            .with_stops([crate::domain::StopId::new(3)]);
        assert_eq!(
            ride_stops_params(&query),
            vec![
                ("gtfs_ride_ids", "1,2".to_string()),
                ("gtfs_stop_ids", "3".to_string()),
            ]
        );
    }

    // Requests against the live API are not exercised here; the estimator is
    // tested against in-memory sources.
}
