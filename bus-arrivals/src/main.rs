use std::error::Error;
use std::net::SocketAddr;
use std::str::FromStr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bus_arrivals::estimator::{EstimatorConfig, MAX_HITS_COUNT};
use bus_arrivals::stride::{FixtureSource, ScheduleBackend, StrideClient, StrideConfig};
use bus_arrivals::web::{AppState, create_router};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Read an optional variable, falling back to `default` when it is unset.
fn env_or<T>(name: &str, default: T) -> Result<T, Box<dyn Error>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("invalid {name}={raw:?}: {e}").into()),
        Err(_) => Ok(default),
    }
}

fn schedule_backend() -> Result<ScheduleBackend, Box<dyn Error>> {
    if let Ok(path) = std::env::var("STRIDE_FIXTURES") {
        warn!(%path, "serving recorded fixtures instead of the live API");
        return Ok(ScheduleBackend::Fixture(FixtureSource::load(&path)?));
    }

    let defaults = StrideConfig::default();
    let mut config = StrideConfig::new()
        .with_timeout(env_or("STRIDE_TIMEOUT_SECS", defaults.timeout_secs)?)
        .with_max_concurrent(env_or("STRIDE_MAX_CONCURRENT", defaults.max_concurrent)?);
    if let Ok(url) = std::env::var("STRIDE_BASE_URL") {
        config = config.with_base_url(url);
    }

    let client = StrideClient::new(config)?;
    info!(base_url = client.base_url(), "using Stride API");
    Ok(ScheduleBackend::Stride(client))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let source = schedule_backend()?;
    let config = EstimatorConfig::default().with_max_hits(env_or("MAX_HITS_COUNT", MAX_HITS_COUNT)?);
    let state = AppState::new(source, config);

    let app = create_router(state);

    let addr: SocketAddr = env_or("BIND_ADDR", DEFAULT_BIND_ADDR.to_string())?.parse()?;
    info!(%addr, "bus arrival estimator listening");
    info!("  GET /health");
    info!("  GET /api/routes?operator=&line=&timestamp=");
    info!("  GET /api/stops?route_ids=&timestamp=");
    info!("  GET /api/arrivals?route_id=&stop_id=&minutes_from_start=&timestamp=");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
