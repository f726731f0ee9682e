use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::{error::ApiError, state::AppState};
use sched_core::validate;
use types::GenerateRequest;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobCreated {
    pub job_id: String,
    pub status: String,
}

#[utoipa::path(
    post,
    path = "/v1/timetables/generate",
    request_body = GenerateRequest,
    responses(
    (status = 200, description = "Generation job accepted", body = JobCreated),
    (status = 400, description = "Request failed preconditions")
    )
)]
pub async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<JobCreated>, ApiError> {
    validate(&req)?;
    let id = state.jobs.enqueue(req);
    info!(job = %id.0, "generation queued");
    Ok(Json(JobCreated {
        job_id: id.0,
        status: "queued".into(),
    }))
}
