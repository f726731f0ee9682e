mod config;
mod error;
mod state;
mod telemetry;
pub mod routes {
    pub mod explain;
    pub mod generate;
    pub mod health;
    pub mod jobs;
    pub mod timetables;
    pub mod validate;
}

use axum::{
    routing::{get, post},
    Router,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            routes::health::health,
            routes::validate::validate_handler,
            routes::generate::generate,
            routes::jobs::status,
            routes::jobs::result,
            routes::timetables::get_timetable,
            routes::timetables::approve,
            routes::timetables::publish,
            routes::explain::explain,
        ),
        components(schemas(
            types::GenerateRequest, types::Subject, types::Faculty, types::Classroom,
            types::Timeslot, types::EngineConfig, types::FitnessWeights, types::RoomRequirements,
            types::RoomType, types::AvailabilitySlot, types::Leave, types::LeaveStatus,
            types::FacultyPreferences, types::Equipment, types::Accessibility, types::Weekday,
            types::Violation, types::ViolationKind, types::FitnessBreakdown, types::Metrics,
            types::TerminationState, types::Placement, types::RunStats,
            types::Timetable, types::TimetableEntry, types::TimetableStatus,
            types::FacultyId, types::ClassroomId, types::SubjectId, types::TimeslotId,
            types::SessionId, types::TimetableId,
            jobs::JobId, jobs::JobStatus,
            routes::validate::ValidationReport,
            routes::generate::JobCreated,
            routes::explain::ExplainIn,
            routes::explain::SlotChoice,
            routes::explain::ExplainOut
        )),
        tags(
            (name = "timetable", description = "Timetable generation API")
        )
    )]
struct ApiDoc;

fn router(app_state: state::AppState, request_timeout: std::time::Duration) -> Router {
    Router::new()
        .route("/v1/health", get(routes::health::health))
        .route("/v1/validate", post(routes::validate::validate_handler))
        .route("/v1/timetables/generate", post(routes::generate::generate))
        .route("/v1/timetables/:id", get(routes::timetables::get_timetable))
        .route("/v1/timetables/:id/approve", post(routes::timetables::approve))
        .route("/v1/timetables/:id/publish", post(routes::timetables::publish))
        .route("/v1/explain", post(routes::explain::explain))
        .route("/v1/jobs/:id", get(routes::jobs::status))
        .route("/v1/jobs/:id/result", get(routes::jobs::result))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(telemetry::stack(request_timeout))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let cfg = config::ServerConfig::from_env()?;
    let app = router(state::AppState::from_config(&cfg), cfg.request_timeout);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
