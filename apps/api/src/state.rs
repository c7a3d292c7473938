use std::sync::Arc;

use crate::benchmarks::Benchmarks;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Stage weights and depth expectations, loaded once at startup and read-only after.
    pub benchmarks: Arc<Benchmarks>,
    pub config: Config,
}
