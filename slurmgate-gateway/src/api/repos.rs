//! Repository claim endpoints
//!
//! Reserved for letting cluster users claim or release repositories with a
//! signed request. Not implemented yet; every call answers 501.

use crate::api::error::{ApiError, ApiResult};
use axum::http::StatusCode;

/// GET|POST|DELETE /config/repos
pub async fn repository_claims() -> ApiResult<StatusCode> {
    Err(ApiError::NotImplemented(
        "Repository claims are not supported yet".to_string(),
    ))
}
