use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use crate::{error::ApiError, state::AppState};
use types::Timetable;

#[utoipa::path(
        get,
        path = "/v1/jobs/{id}",
        params(("id" = String, Path, description = "Job ID")),
        responses(
            (status = 200, description = "Job status", body = jobs::JobStatus),
            (status = 404, description = "Unknown job")
        )
    )]
pub async fn status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<jobs::JobStatus>, ApiError> {
    state
        .jobs
        .get(&id)
        .map(Json)
        .ok_or_else(|| ApiError(StatusCode::NOT_FOUND, format!("job {id} not found")))
}

#[utoipa::path(
        get,
        path = "/v1/jobs/{id}/result",
        params(("id" = String, Path, description = "Job ID")),
        responses(
            (status = 200, description = "Generated timetable", body = Timetable),
            (status = 404, description = "Unknown job"),
            (status = 409, description = "Job not finished or failed")
        )
    )]
pub async fn result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Timetable>, ApiError> {
    match state.jobs.get(&id) {
        Some(jobs::JobStatus::Solved { result }) => Ok(Json(result)),
        Some(jobs::JobStatus::Failed { message }) => Err(ApiError(StatusCode::CONFLICT, message)),
        Some(_) => Err(ApiError(StatusCode::CONFLICT, format!("job {id} not ready"))),
        None => Err(ApiError(StatusCode::NOT_FOUND, format!("job {id} not found"))),
    }
}
