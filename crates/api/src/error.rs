use axum::{http::StatusCode, response::{IntoResponse, Response}};
use jobs::store::StoreError;
use sched_core::ValidationError;

#[derive(Debug)]
pub struct ApiError(pub StatusCode, pub String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response { (self.0, self.1).into_response() }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self { ApiError(StatusCode::BAD_REQUEST, e.to_string()) }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        let status = match e {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::InvalidTransition { .. } => StatusCode::CONFLICT,
        };
        ApiError(status, e.to_string())
    }
}
