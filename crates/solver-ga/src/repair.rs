//! Bounded randomized repair of hard-constraint violations.

use rand::seq::SliceRandom;
use rand::Rng;
use sched_core::{checker, Chromosome, ChromosomeError, Snapshot};
use types::{Violation, ViolationKind};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Checker passes run.
    pub attempts: usize,
    /// Genes actually reassigned.
    pub reassignments: usize,
    /// Violations left when the routine stopped.
    pub remaining: usize,
}

/// Works on a copy of `ch`: each attempt re-checks and applies a randomized
/// fix to the first reported violation. Stops when clean or after
/// `max_attempts` passes. Faculty unavailability has no fix and stays.
pub fn repair<R: Rng + ?Sized>(
    snap: &Snapshot,
    ch: &Chromosome,
    max_attempts: usize,
    rng: &mut R,
) -> Result<(Chromosome, RepairReport), ChromosomeError> {
    let mut out = ch.clone();
    let mut report = RepairReport::default();

    while report.attempts < max_attempts {
        report.attempts += 1;
        let violations = checker::check(snap, &out)?;
        let Some(first) = violations.first() else {
            return Ok((out, report));
        };
        if fix(snap, &mut out, first, rng) {
            report.reassignments += 1;
        }
    }

    report.remaining = checker::count(snap, &out)?;
    Ok((out, report))
}

fn fix<R: Rng + ?Sized>(snap: &Snapshot, ch: &mut Chromosome, v: &Violation, rng: &mut R) -> bool {
    let i = v.session_index;
    let session = &snap.sessions[i];
    match v.kind {
        ViolationKind::FacultyConflict | ViolationKind::RoomConflict => {
            ch.genes[i].timeslot = rng.gen_range(0..snap.timeslots.len());
            true
        }
        ViolationKind::CapacityViolation => {
            let fits: Vec<usize> = (0..snap.classrooms.len())
                .filter(|&r| snap.classrooms[r].capacity >= session.enrollment)
                .collect();
            reassign_room(ch, i, &fits, rng)
        }
        ViolationKind::RoomTypeMismatch => {
            let Some(required) = &session.requirements.room_type else {
                return false;
            };
            let typed: Vec<usize> = (0..snap.classrooms.len())
                .filter(|&r| &snap.classrooms[r].room_type == required)
                .collect();
            reassign_room(ch, i, &typed, rng)
        }
        ViolationKind::FacultyUnavailable => false,
    }
}

fn reassign_room<R: Rng + ?Sized>(ch: &mut Chromosome, i: usize, rooms: &[usize], rng: &mut R) -> bool {
    match rooms.choose(rng) {
        Some(&r) => {
            ch.genes[i].classroom = r;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use sched_core::testkit::*;
    use sched_core::Gene;
    use types::RoomType;

    fn gene(timeslot: usize, classroom: usize) -> Gene {
        Gene {
            timeslot,
            classroom,
        }
    }

    #[test]
    fn clean_chromosome_is_returned_untouched() {
        let req = request(
            vec![subject("a", 2, 20, &["f1"])],
            vec![faculty("f1")],
            vec![classroom("r1", 40)],
            week_slots(2),
        );
        let snap = Snapshot::load(&req, day()).unwrap();
        let ch = Chromosome {
            genes: vec![gene(0, 0), gene(3, 0)],
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (fixed, report) = repair(&snap, &ch, 100, &mut rng).unwrap();
        assert_eq!(fixed, ch);
        assert_eq!(report.reassignments, 0);
        assert_eq!(report.remaining, 0);
    }

    #[test]
    fn capacity_violation_moves_to_a_big_enough_room() {
        let req = request(
            vec![subject("a", 1, 50, &["f1"])],
            vec![faculty("f1")],
            vec![classroom("small", 40), classroom("big", 60)],
            week_slots(1),
        );
        let snap = Snapshot::load(&req, day()).unwrap();
        let ch = Chromosome {
            genes: vec![gene(0, 0)],
        };
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let (fixed, report) = repair(&snap, &ch, 100, &mut rng).unwrap();
        assert_eq!(fixed.genes[0].classroom, 1);
        assert_eq!(report.reassignments, 1);
        assert_eq!(report.remaining, 0);
        assert!(checker::check(&snap, &fixed).unwrap().is_empty());
        // input is never modified
        assert_eq!(ch.genes[0].classroom, 0);
    }

    #[test]
    fn room_type_mismatch_moves_to_matching_room() {
        let mut lab = subject("lab", 1, 20, &["f1"]);
        lab.room_requirements.room_type = Some(RoomType::Laboratory);
        let mut lab_room = classroom("lab1", 30);
        lab_room.room_type = RoomType::Laboratory;
        let req = request(
            vec![lab],
            vec![faculty("f1")],
            vec![classroom("r1", 40), lab_room],
            week_slots(1),
        );
        let snap = Snapshot::load(&req, day()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let (fixed, _) = repair(&snap, &Chromosome { genes: vec![gene(0, 0)] }, 100, &mut rng).unwrap();
        assert_eq!(fixed.genes[0].classroom, 1);
    }

    #[test]
    fn unfixable_capacity_exhausts_the_budget() {
        let req = request(
            vec![subject("a", 1, 500, &["f1"])],
            vec![faculty("f1")],
            vec![classroom("r1", 40)],
            week_slots(1),
        );
        let snap = Snapshot::load(&req, day()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let (fixed, report) =
            repair(&snap, &Chromosome { genes: vec![gene(0, 0)] }, 100, &mut rng).unwrap();
        assert_eq!(report.attempts, 100);
        assert_eq!(report.reassignments, 0);
        assert_eq!(report.remaining, 1);
        assert_eq!(fixed.genes[0], gene(0, 0));
    }

    #[test]
    fn faculty_unavailability_is_left_alone() {
        let mut f = faculty("f1");
        f.availability.clear();
        let req = request(
            vec![subject("a", 1, 10, &["f1"])],
            vec![f],
            vec![classroom("r1", 40)],
            week_slots(2),
        );
        let snap = Snapshot::load(&req, day()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let ch = Chromosome {
            genes: vec![gene(0, 0)],
        };
        let (fixed, report) = repair(&snap, &ch, 100, &mut rng).unwrap();
        assert_eq!(fixed, ch);
        assert_eq!(report.attempts, 100);
        assert_eq!(report.remaining, 1);
    }

    #[test]
    fn conflicts_get_resolved_with_enough_slots() {
        let req = request(
            vec![subject("a", 3, 10, &["f1"])],
            vec![faculty("f1")],
            vec![classroom("r1", 40)],
            week_slots(4),
        );
        let snap = Snapshot::load(&req, day()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let ch = Chromosome {
            genes: vec![gene(0, 0), gene(0, 0), gene(0, 0)],
        };
        let (fixed, report) = repair(&snap, &ch, 100, &mut rng).unwrap();
        assert_eq!(report.remaining, 0);
        assert!(report.attempts <= 100);
        assert!(checker::check(&snap, &fixed).unwrap().is_empty());
    }

    #[test]
    fn malformed_chromosome_is_an_error() {
        let req = request(
            vec![subject("a", 1, 10, &["f1"])],
            vec![faculty("f1")],
            vec![classroom("r1", 40)],
            week_slots(1),
        );
        let snap = Snapshot::load(&req, day()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert!(repair(&snap, &Chromosome { genes: vec![] }, 100, &mut rng).is_err());
    }
}
