use types::Metrics;

use crate::checker;
use crate::chromosome::Chromosome;
use crate::error::ChromosomeError;
use crate::scoring;
use crate::snapshot::Snapshot;

/// Reportable statistics of a finished schedule, percentages in [0, 100].
pub fn compute_metrics(snap: &Snapshot, ch: &Chromosome) -> Result<Metrics, ChromosomeError> {
    let conflict_count = checker::count(snap, ch)?;
    Ok(Metrics {
        session_count: snap.sessions.len(),
        utilization_pct: scoring::utilization(snap, ch) * 100.0,
        balance_pct: scoring::balance(snap, ch) * 100.0,
        conflict_count,
        preference_satisfaction_pct: scoring::preference(snap, ch) * 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::Gene;
    use crate::testkit::*;

    #[test]
    fn metrics_scale_scores_to_percent() {
        let req = request(
            vec![subject("a", 1, 50, &["f1"])],
            vec![faculty("f1")],
            vec![classroom("r1", 40), classroom("r2", 60)],
            week_slots(1),
        );
        let snap = Snapshot::load(&req, day()).unwrap();
        let ch = Chromosome {
            genes: vec![Gene {
                timeslot: 0,
                classroom: 0,
            }],
        };
        let m = compute_metrics(&snap, &ch).unwrap();
        assert_eq!(m.session_count, 1);
        assert_eq!(m.conflict_count, 1);
        assert!((m.utilization_pct - 10.0).abs() < 1e-9);
        assert_eq!(m.balance_pct, 100.0);
        assert_eq!(m.preference_satisfaction_pct, 0.0);
    }
}
