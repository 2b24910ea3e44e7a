//! Runner API Handlers
//!
//! HTTP endpoint for launching ephemeral runners.

use axum::{Json, extract::State};
use slurmgate_core::dto::launch::LaunchRequest;
use slurmgate_core::dto::status::StatusResponse;

use crate::api::error::ApiResult;
use crate::service::launch_service;
use crate::state::AppState;

/// POST /runner/start
/// Submit a batch job that starts one ephemeral runner
pub async fn start_runner(
    State(state): State<AppState>,
    Json(req): Json<LaunchRequest>,
) -> ApiResult<Json<StatusResponse>> {
    let submitted = launch_service::launch_runner(&state, req).await?;

    Ok(Json(StatusResponse::ok().with_job_id(submitted.job_id)))
}
