pub mod checker;
pub mod chromosome;
pub mod error;
pub mod metrics;
pub mod scoring;
pub mod session;
pub mod snapshot;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

use async_trait::async_trait;

pub use chromosome::{init_population, Chromosome, Gene};
pub use error::{ChromosomeError, EvaluationError, ValidationError};
pub use session::{expand_sessions, Session};
pub use snapshot::{validate, Dims, Snapshot};
pub use types::{GenerateRequest, ScheduleOutcome};

#[async_trait]
pub trait Solver: Send + Sync + 'static {
    async fn solve(&self, req: GenerateRequest) -> anyhow::Result<ScheduleOutcome>;
}
