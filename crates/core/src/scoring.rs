//! Multi-objective fitness of a chromosome. Every sub-score lies in [0, 1],
//! higher is better.

use std::collections::{BTreeMap, HashSet};

use types::{FacultyId, FitnessBreakdown, FitnessWeights};

use crate::checker;
use crate::chromosome::Chromosome;
use crate::error::EvaluationError;
use crate::snapshot::Snapshot;

/// Distinct (timeslot, classroom) pairs used over all available pairs.
pub fn utilization(snap: &Snapshot, ch: &Chromosome) -> f64 {
    let total = snap.classrooms.len() * snap.timeslots.len();
    if total == 0 {
        return 0.0;
    }
    let used: HashSet<(usize, usize)> = ch.genes.iter().map(|g| (g.timeslot, g.classroom)).collect();
    (used.len() as f64 / total as f64).clamp(0.0, 1.0)
}

/// Assigned teaching hours per faculty member. Ordered so float sums over it
/// are reproducible.
pub fn faculty_hours<'a>(snap: &'a Snapshot, ch: &Chromosome) -> BTreeMap<&'a FacultyId, f64> {
    let mut hours: BTreeMap<&FacultyId, f64> = BTreeMap::new();
    for (session, gene) in snap.sessions.iter().zip(&ch.genes) {
        let h = snap.slot_windows[gene.timeslot].hours();
        for f in &session.faculty {
            *hours.entry(f).or_default() += h;
        }
    }
    hours
}

/// `1 / (1 + σ)` of per-faculty hours; 1 when no hours are tracked.
pub fn balance(snap: &Snapshot, ch: &Chromosome) -> f64 {
    let hours = faculty_hours(snap, ch);
    if hours.is_empty() {
        return 1.0;
    }
    let n = hours.len() as f64;
    let mean = hours.values().sum::<f64>() / n;
    let var = hours.values().map(|h| (h - mean).powi(2)).sum::<f64>() / n;
    (1.0 / (1.0 + var.sqrt())).clamp(0.0, 1.0)
}

/// Share of (session, faculty) pairs landing on one of that member's
/// preferred weekdays; 1 when there are no pairs.
pub fn preference(snap: &Snapshot, ch: &Chromosome) -> f64 {
    let mut pairs = 0usize;
    let mut satisfied = 0usize;
    for (session, gene) in snap.sessions.iter().zip(&ch.genes) {
        let day = snap.slot_windows[gene.timeslot].day;
        for f in &session.faculty {
            pairs += 1;
            if snap.faculty_record(f).is_some_and(|r| r.prefers(day)) {
                satisfied += 1;
            }
        }
    }
    if pairs == 0 {
        return 1.0;
    }
    satisfied as f64 / pairs as f64
}

/// `1 - violations / (2 * sessions)`, floored at 0.
pub fn penalty(violations: usize, sessions: usize) -> f64 {
    if sessions == 0 {
        return if violations == 0 { 1.0 } else { 0.0 };
    }
    (1.0 - violations as f64 / (2.0 * sessions as f64)).clamp(0.0, 1.0)
}

pub fn combine(w: &FitnessWeights, utilization: f64, balance: f64, preference: f64, penalty: f64) -> f64 {
    (w.utilization * utilization + w.balance * balance + w.preference * preference + w.penalty * penalty)
        .clamp(0.0, 1.0)
}

/// Scores a chromosome against the snapshot, running the checker for the
/// penalty term.
pub fn evaluate(snap: &Snapshot, ch: &Chromosome) -> Result<FitnessBreakdown, EvaluationError> {
    let violations = checker::count(snap, ch)?;
    evaluate_with_violations(snap, ch, violations)
}

pub fn evaluate_with_violations(
    snap: &Snapshot,
    ch: &Chromosome,
    violations: usize,
) -> Result<FitnessBreakdown, EvaluationError> {
    ch.check_bounds(snap.dims())?;

    let u = utilization(snap, ch);
    let b = balance(snap, ch);
    let p = preference(snap, ch);
    let pen = penalty(violations, snap.sessions.len());
    for (name, v) in [
        ("utilization", u),
        ("balance", b),
        ("preference", p),
        ("penalty", pen),
    ] {
        if !v.is_finite() {
            return Err(EvaluationError::NonFinite(name));
        }
    }
    let fitness = combine(&snap.config.fitness_weights, u, b, p, pen);
    if !fitness.is_finite() {
        return Err(EvaluationError::NonFinite("fitness"));
    }
    Ok(FitnessBreakdown {
        utilization: u,
        balance: b,
        preference: p,
        penalty: pen,
        fitness,
    })
}

/// Fitness only.
pub fn fitness(snap: &Snapshot, ch: &Chromosome) -> Result<f64, EvaluationError> {
    evaluate(snap, ch).map(|b| b.fitness)
}
