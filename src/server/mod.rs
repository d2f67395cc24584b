//! HTTP relay gateway
//!
//! Stateless request/response proxy between the widget and the upstream
//! completion API, plus the per-session context window and a liveness
//! probe.

pub mod chat;
pub mod context;
pub mod upstream;

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::Result;
use context::ContextStore;
use upstream::CompletionClient;

/// Shared state for the gateway handlers
pub struct AppState {
    /// Upstream completion client
    pub upstream: Arc<dyn CompletionClient>,
    /// Session-keyed conversation windows
    pub contexts: Mutex<ContextStore>,
}

impl AppState {
    /// Create gateway state over an upstream client
    #[must_use]
    pub fn new(upstream: Arc<dyn CompletionClient>) -> Self {
        Self {
            upstream,
            contexts: Mutex::new(ContextStore::new()),
        }
    }
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Liveness probe
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the gateway router
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", chat::router(state))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Run the gateway until interrupted
///
/// # Errors
///
/// Returns error if the listener cannot bind or the server fails
pub async fn run(state: Arc<AppState>, port: u16) -> Result<()> {
    let app = router(state);
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "gateway listening");
    axum::serve(listener, app).await?;
    Ok(())
}
