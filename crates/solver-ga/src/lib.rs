pub mod allocator;
pub mod error;
pub mod evolution;
pub mod operators;
pub mod placement;
pub mod repair;

use async_trait::async_trait;
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sched_core::{checker, metrics, scoring, GenerateRequest, ScheduleOutcome, Snapshot, Solver};
use tracing::{info, warn};
use types::RunStats;

pub use error::{BreedError, EngineError};
use evolution::Evolution;

pub struct GaSolver;
impl GaSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GaSolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Solver for GaSolver {
    async fn solve(&self, req: GenerateRequest) -> anyhow::Result<ScheduleOutcome> {
        let snap = Snapshot::load_now(&req)?;
        let seed = req.config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        Ok(run(&snap, seed)?)
    }
}

/// Full pipeline over a loaded snapshot: evolve, repair the winner once
/// more, refine classrooms, then measure and resolve ids. All randomness
/// comes from one `ChaCha8Rng` seeded with `seed`.
pub fn run(snap: &Snapshot, seed: u64) -> Result<ScheduleOutcome, EngineError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let cfg = &snap.config;
    info!(
        seed,
        sessions = snap.sessions.len(),
        population = cfg.population_size,
        max_generations = cfg.max_generations,
        "optimization started"
    );

    let outcome = Evolution::new(snap, &mut rng)?.run()?;
    let mut degradations = outcome.degradations;

    let best = match repair::repair(snap, &outcome.best.chromosome, cfg.repair_attempts, &mut rng) {
        Ok((fixed, _)) => fixed,
        Err(e) => {
            warn!(error = %e, "final repair failed, keeping evolved best");
            degradations.swallowed_repairs += 1;
            outcome.best.chromosome.clone()
        }
    };

    let allocated = allocator::allocate(snap, &best);
    if allocated.len() != best.len() {
        return Err(EngineError::AllocationMismatch {
            expected: best.len(),
            actual: allocated.len(),
        });
    }

    let violations = checker::check(snap, &allocated)?;
    let metrics = metrics::compute_metrics(snap, &allocated)?;
    let fitness = scoring::evaluate_with_violations(snap, &allocated, violations.len())
        .map(|b| b.fitness)
        .unwrap_or(0.0);
    let placements = placement::to_placements(snap, &allocated)?;

    info!(
        generations = outcome.generations,
        termination = ?outcome.termination,
        fitness,
        best_ga_fitness = outcome.best.fitness,
        residual_violations = violations.len(),
        "optimization finished"
    );

    Ok(ScheduleOutcome {
        department: snap.department.clone(),
        semester: snap.semester,
        program: snap.program.clone(),
        placements,
        metrics,
        fitness,
        generations: outcome.generations,
        termination: outcome.termination,
        stats: RunStats {
            seed,
            best_ga_fitness: outcome.best.fitness,
            residual_violations: violations.len(),
            failed_evaluations: degradations.failed_evaluations,
            failed_breedings: degradations.failed_breedings,
            swallowed_repairs: degradations.swallowed_repairs,
        },
        violations,
    })
}
