//! HTTP liveness endpoint for hosting platforms that ping a port.
//!
//! - `/` answers "Bot is alive"
//! - `/health` answers "ok"

use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

/// Routes served by the liveness endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
}

/// Serve the liveness endpoint on `0.0.0.0:port` until the process exits.
///
/// # Errors
///
/// Returns an error if the port cannot be bound.
pub async fn start_health_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    info!("Health endpoint listening on http://{}", addr);
    axum::serve(listener, router()).await
}

async fn root_handler() -> impl IntoResponse {
    (StatusCode::OK, "Bot is alive")
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
