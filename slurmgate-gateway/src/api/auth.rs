//! Shared-secret guard
//!
//! Every mutating endpoint requires the `auth-token` header to equal the
//! configured shared secret exactly. The check runs before body parsing.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::api::error::ApiError;
use crate::state::AppState;

/// Header carrying the shared secret
pub const AUTH_HEADER: &str = "auth-token";

/// Rejects requests without the current shared secret
pub async fn require_shared_secret(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let config = state.config.snapshot();
    let presented = req
        .headers()
        .get(AUTH_HEADER)
        .map(|value| value.to_str().is_ok_and(|token| config.accepts_secret(token)));

    match presented {
        Some(true) => Ok(next.run(req).await),
        Some(false) => {
            tracing::warn!("Invalid auth token received for {}", req.uri().path());
            Err(ApiError::Unauthorized)
        }
        None => {
            tracing::warn!("Missing auth token for {}", req.uri().path());
            Err(ApiError::Unauthorized)
        }
    }
}
