//! API Module
//!
//! HTTP API layer for the gateway.
//! Each submodule handles endpoints for a specific concern.

pub mod auth;
pub mod error;
pub mod reload;
pub mod repos;
pub mod runner;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Guarded endpoints
        .route("/runner/start", post(runner::start_runner))
        .route("/api/reload", post(reload::reload_config))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_shared_secret,
        ))
        // Health check
        .route("/health", get(health_check))
        // Repository claim placeholders
        .route(
            "/config/repos",
            get(repos::repository_claims)
                .post(repos::repository_claims)
                .delete(repos::repository_claims),
        )
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// GET /health
/// Liveness probe; needs no secret
async fn health_check() -> &'static str {
    "OK"
}
