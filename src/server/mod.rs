pub mod api;

use crate::services::EquityExplorer;
use axum::http::Method;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub explorer: Arc<EquityExplorer>,
    pub started_at: Instant,
}

/// Start the axum server wrapping the statement pipeline
pub async fn serve(explorer: EquityExplorer, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState {
        explorer: Arc::new(explorer),
        started_at: Instant::now(),
    };

    // Permissive CORS; the API serves local dashboards only
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    tracing::info!("Registering routes:");
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /api/status");
    tracing::info!("  GET  /api/tickers");
    tracing::info!("  GET  /api/files");
    tracing::info!("  POST /api/process");

    let app = Router::new()
        .route("/health", get(api::health_handler))
        .route("/api/status", get(api::status_handler))
        .route("/api/tickers", get(api::tickers_handler))
        .route("/api/files", get(api::files_handler))
        .route("/api/process", post(api::process_handler))
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
