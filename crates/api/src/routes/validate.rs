use axum::{http::StatusCode, Json};
use sched_core::validate;
use serde::Serialize;
use types::GenerateRequest;

#[derive(Serialize, utoipa::ToSchema)]
pub struct ValidationReport {
    pub ok: bool,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn of(req: &GenerateRequest) -> Self {
        match validate(req) {
            Ok(()) => ValidationReport { ok: true, errors: vec![] },
            Err(e) => ValidationReport {
                ok: false,
                errors: e.causes().to_vec(),
            },
        }
    }
}

#[utoipa::path(
    post,
    path = "/v1/validate",
    request_body = GenerateRequest,
    responses(
    (status = 200, description = "Every precondition failure for the request", body = ValidationReport)
    )
)]
pub async fn validate_handler(Json(req): Json<GenerateRequest>) -> (StatusCode, Json<ValidationReport>) {
    (StatusCode::OK, Json(ValidationReport::of(&req)))
}
