//! `aegis-server`: the mesh's HTTP surface and process entry point.
//! Composes the eleven routes of the external-interface contract over
//! one shared `AppState`, wires `tower_http` tracing/CORS, and drains
//! the memory graph's retry buffer on graceful shutdown — an
//! operator-initiated `Ctrl-C` exercises the same safety invariant as
//! an automated Phoenix restart.

mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = config::Config::from_env()?;
    let state = Arc::new(AppState::new(config.recovery_log_path));
    let cancel = CancellationToken::new();
    state
        .memory_graph
        .spawn_auto_flush(aegis_synapse::retry_buffer::DEFAULT_AUTO_FLUSH_INTERVAL, cancel.clone());

    let app = routes::router(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(%addr, "aegis-server starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state, cancel))
        .await?;

    Ok(())
}

async fn shutdown_signal(state: Arc<AppState>, cancel: CancellationToken) {
    tokio::signal::ctrl_c().await.ok();
    tracing::info!("shutdown signal received, draining memory graph retry buffer");
    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(10), state.memory_graph.drain_before_shutdown())
        .await
        .ok();
}
