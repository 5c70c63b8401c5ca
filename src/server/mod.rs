//! HTTP front end for the identification service.
//!
//! Routes:
//! - `POST /identify/file` - multipart upload (`file` field)
//! - `POST /identify/url` - JSON `{"url": "..."}`
//! - `GET /health` - `{"status": "ok", "queueLength": N}`

pub mod routes;

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::{Error, Result, ResultExt};
use crate::identify::IdentificationService;

/// Build the router around a shared service
pub fn router(service: Arc<IdentificationService>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/identify/file", post(routes::identify_file))
        .route("/identify/url", post(routes::identify_url))
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Bind and serve until Ctrl-C
pub async fn serve(service: Arc<IdentificationService>, config: &ServerConfig) -> Result<()> {
    let ip: IpAddr = config
        .host
        .parse()
        .map_err(|_| Error::Address(config.host.clone()))?;
    let addr = SocketAddr::from((ip, config.port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(format!("binding {addr}"))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(service, config.max_upload_bytes))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context("serving HTTP")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
