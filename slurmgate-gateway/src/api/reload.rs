//! Config API Handlers

use axum::{Json, extract::State};
use slurmgate_core::dto::status::StatusResponse;

use crate::api::error::ApiResult;
use crate::state::AppState;

/// POST /api/reload
/// Re-read the config file; a bad file leaves the active config in place
pub async fn reload_config(State(state): State<AppState>) -> ApiResult<Json<StatusResponse>> {
    state.config.reload().await?;

    Ok(Json(StatusResponse::ok()))
}
