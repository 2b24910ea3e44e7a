//! API Error Handling
//!
//! Unified error types and conversion for API responses.
//! Responses stay opaque; the detail goes to the log only.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::config::ConfigError;
use crate::service::launch_service::LaunchError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    NotImplemented(String),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "message": "auth-token missing" })),
            )
                .into_response(),
            ApiError::NotImplemented(msg) => (
                StatusCode::NOT_IMPLEMENTED,
                Json(serde_json::json!({ "error": msg })),
            )
                .into_response(),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

/// Every launch failure, an unknown repository included, looks the same to
/// the caller so the response never reveals which repositories are configured.
impl From<LaunchError> for ApiError {
    fn from(err: LaunchError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::InternalError(format!("Config reload failed, keeping previous config: {}", err))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
