//! Application state for the web layer.

use std::sync::Arc;

use crate::estimator::EstimatorConfig;
use crate::stride::ScheduleBackend;

/// Shared application state.
///
/// Contains everything the handlers need to run the pipeline.
#[derive(Clone)]
pub struct AppState {
    /// Schedule source (live API or fixture)
    pub source: Arc<ScheduleBackend>,

    /// Pipeline limits and windows
    pub config: Arc<EstimatorConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(source: ScheduleBackend, config: EstimatorConfig) -> Self {
        Self {
            source: Arc::new(source),
            config: Arc::new(config),
        }
    }
}
