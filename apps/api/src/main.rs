mod benchmarks;
mod config;
mod errors;
mod models;
mod routes;
mod scoring;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::benchmarks::Benchmarks;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Maturity API v{}", env!("CARGO_PKG_VERSION"));

    // Benchmarks are required: no listener without stage weights and depth tables
    let benchmarks = Benchmarks::load(&config.stage_benchmarks_path, &config.depth_benchmarks_path)
        .context("Failed to load benchmark configuration")?;
    info!(
        "Scoring options: allow_default_profile={}, depth_adjusted_gaps={}",
        config.allow_default_profile, config.depth_adjusted_gaps
    );

    let state = AppState {
        benchmarks: Arc::new(benchmarks),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the assessment UI has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
