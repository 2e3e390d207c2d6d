//! Callback Gateway HTTP Server
//!
//! Hosts the callback route and routes incoming redirects to the
//! reconciler.

pub mod callback_handlers;

use crate::config::AppConfig;
use crate::reconcile::Reconciler;
use axum::{routing::get, Router as AxumRouter};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Reconciles provider redirects against the backend API
    pub reconciler: Reconciler,
}

/// Build the router. Split out from [`start_server`] so tests can drive
/// the routes without binding a socket.
pub fn build_router(config: &AppConfig) -> AxumRouter {
    let state = Arc::new(AppState {
        reconciler: Reconciler::new(config.api_base_url.clone()),
    });

    AxumRouter::new()
        .route("/callback", get(callback_handlers::oauth_callback))
        .route("/healthz", get(callback_handlers::healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the callback gateway HTTP server
///
/// Routes:
/// - GET /callback - OAuth redirect callback
/// - GET /healthz  - Liveness probe
///
/// # Errors
/// Returns error if the listener cannot bind or the server loop fails
pub async fn start_server(host: &str, port: u16, config: &AppConfig) -> anyhow::Result<()> {
    let app = build_router(config);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    info!("[INFO] Callback gateway listening on {}", addr);
    info!("[INFO] Available endpoints:");
    info!("  GET    /callback           - OAuth redirect callback");
    info!("  GET    /healthz            - Liveness probe");

    axum::serve(listener, app).await?;

    Ok(())
}
