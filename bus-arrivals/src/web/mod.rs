//! Web layer for the arrival estimator.
//!
//! Exposes the three pipeline stages as JSON endpoints.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
