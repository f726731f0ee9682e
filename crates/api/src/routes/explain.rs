use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use sched_core::{checker, metrics::compute_metrics, scoring, Chromosome, Snapshot};
use types::{ClassroomId, FitnessBreakdown, GenerateRequest, Metrics, TimeslotId, Violation};

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExplainIn {
    pub request: GenerateRequest,
    /// One entry per session, in session order.
    pub placements: Vec<SlotChoice>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotChoice {
    pub timeslot_id: TimeslotId,
    pub classroom_id: ClassroomId,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExplainOut {
    pub violations: Vec<Violation>,
    pub fitness: FitnessBreakdown,
    pub metrics: Metrics,
}

pub fn explain_placements(input: &ExplainIn) -> Result<ExplainOut, ApiError> {
    let snap = Snapshot::load_now(&input.request)?;
    let genes = input
        .placements
        .iter()
        .enumerate()
        .map(|(i, p)| {
            snap.gene_for(&p.timeslot_id, &p.classroom_id)
                .map_err(|e| unprocessable(format!("placement {i}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let ch = Chromosome { genes };

    let violations = checker::check(&snap, &ch).map_err(|e| unprocessable(e.to_string()))?;
    let fitness = scoring::evaluate_with_violations(&snap, &ch, violations.len())
        .map_err(|e| unprocessable(e.to_string()))?;
    let metrics = compute_metrics(&snap, &ch).map_err(|e| unprocessable(e.to_string()))?;
    Ok(ExplainOut {
        violations,
        fitness,
        metrics,
    })
}

fn unprocessable(msg: String) -> ApiError {
    ApiError(StatusCode::UNPROCESSABLE_ENTITY, msg)
}

#[utoipa::path(
    post,
    path = "/v1/explain",
    request_body = ExplainIn,
    responses(
    (status = 200, description = "Violations and fitness breakdown for a hand-made placement", body = ExplainOut),
    (status = 400, description = "Request failed preconditions"),
    (status = 422, description = "Placements do not fit the request")
    )
)]
pub async fn explain(Json(input): Json<ExplainIn>) -> Result<Json<ExplainOut>, ApiError> {
    explain_placements(&input).map(Json)
}
