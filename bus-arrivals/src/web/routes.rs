//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{RouteId, parse_id_list};
use crate::estimator::{Estimator, target_start_time};
use crate::stride::StrideError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/routes", get(list_routes))
        .route("/api/stops", get(list_stops))
        .route("/api/arrivals", get(arrival_times))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| AppError::BadRequest {
            message: format!("Invalid timestamp: {raw}"),
        })
}

/// Logical routes of a line for one operator on the timestamp's date.
async fn list_routes(
    State(state): State<AppState>,
    Query(req): Query<RoutesParams>,
) -> Result<Json<RoutesResponse>, AppError> {
    let timestamp = parse_timestamp(&req.timestamp)?;
    if req.operator.trim().is_empty() || req.line.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "operator and line are required".to_string(),
        });
    }

    let estimator = Estimator::new(state.source.as_ref(), state.config.as_ref());
    let routes = estimator
        .routes(timestamp, req.operator.trim(), req.line.trim())
        .await?;

    Ok(Json(RoutesResponse {
        routes: routes.into_iter().map(RouteDto::from).collect(),
    }))
}

/// Ordered stops of one logical route.
async fn list_stops(
    State(state): State<AppState>,
    Query(req): Query<StopsParams>,
) -> Result<Json<StopsResponse>, AppError> {
    let timestamp = parse_timestamp(&req.timestamp)?;
    let route_ids: Vec<RouteId> =
        parse_id_list(&req.route_ids).map_err(|e| AppError::BadRequest {
            message: format!("Invalid route_ids: {e}"),
        })?;

    let estimator = Estimator::new(state.source.as_ref(), state.config.as_ref());
    let stops = estimator.stops(&route_ids, timestamp).await?;

    Ok(Json(StopsResponse {
        stops: stops.into_iter().map(StopDto::from).collect(),
    }))
}

/// Scheduled arrivals at one stop near the reference time.
async fn arrival_times(
    State(state): State<AppState>,
    Query(req): Query<ArrivalsParams>,
) -> Result<Json<ArrivalsResponse>, AppError> {
    let timestamp = parse_timestamp(&req.timestamp)?;
    let stop = req.stop();
    let target_start = target_start_time(&stop, timestamp)?;

    let estimator = Estimator::new(state.source.as_ref(), state.config.as_ref());
    let arrival_times = estimator.arrival_times(&stop, timestamp).await?;

    Ok(Json(ArrivalsResponse {
        stop_id: stop.stop_id,
        route_id: stop.route_id,
        name: req.name,
        stop_sequence: req.stop_sequence,
        target_start_time: target_start,
        arrival_times,
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Upstream { message: String },
    Internal { message: String },
}

impl From<StrideError> for AppError {
    fn from(e: StrideError) -> Self {
        match e {
            StrideError::NotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            StrideError::Fixture(_) => AppError::Internal {
                message: e.to_string(),
            },
            StrideError::InvalidRequest(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            _ => AppError::Upstream {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
