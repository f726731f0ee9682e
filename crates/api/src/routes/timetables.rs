use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use crate::{error::ApiError, state::AppState};
use types::{Timetable, TimetableId};

#[utoipa::path(
        get,
        path = "/v1/timetables/{id}",
        params(("id" = String, Path, description = "Timetable ID")),
        responses(
            (status = 200, description = "Stored timetable", body = Timetable),
            (status = 404, description = "Unknown timetable")
        )
    )]
pub async fn get_timetable(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Timetable>, ApiError> {
    let id = TimetableId::from(id.as_str());
    state
        .jobs
        .timetable(&id)
        .map(Json)
        .ok_or_else(|| ApiError(StatusCode::NOT_FOUND, format!("timetable {id} not found")))
}

#[utoipa::path(
        post,
        path = "/v1/timetables/{id}/approve",
        params(("id" = String, Path, description = "Timetable ID")),
        responses(
            (status = 200, description = "Approved timetable", body = Timetable),
            (status = 404, description = "Unknown timetable"),
            (status = 409, description = "Timetable is not a draft")
        )
    )]
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Timetable>, ApiError> {
    Ok(Json(state.jobs.approve(&TimetableId::from(id.as_str()))?))
}

#[utoipa::path(
        post,
        path = "/v1/timetables/{id}/publish",
        params(("id" = String, Path, description = "Timetable ID")),
        responses(
            (status = 200, description = "Published timetable", body = Timetable),
            (status = 404, description = "Unknown timetable"),
            (status = 409, description = "Timetable is not approved")
        )
    )]
pub async fn publish(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Timetable>, ApiError> {
    Ok(Json(state.jobs.publish(&TimetableId::from(id.as_str()))?))
}
