//! Greedy classroom refinement of the final schedule, one timeslot at a time.

use std::collections::{BTreeMap, HashSet};

use sched_core::{Chromosome, Session, Snapshot};
use types::{Classroom, RoomType};

/// Proximity data is not modelled yet, every room scores the same.
const LOCATION_SCORE: f64 = 0.8;

/// Sessions that are large, equipment-hungry or need a laboratory pick rooms
/// first.
pub fn priority(session: &Session) -> u64 {
    let lab = if session.requirements.room_type == Some(RoomType::Laboratory) {
        100
    } else {
        0
    };
    session.enrollment as u64 * 10 + session.requirements.required_equipment.len() as u64 * 50 + lab
}

/// 1.0 for an 80-100% full room, 0 when over capacity, otherwise the fill
/// ratio.
pub fn capacity_score(enrollment: u32, capacity: u32) -> f64 {
    if capacity == 0 {
        return 0.0;
    }
    let ratio = enrollment as f64 / capacity as f64;
    if ratio > 1.0 {
        0.0
    } else if ratio >= 0.8 {
        1.0
    } else {
        ratio
    }
}

pub fn equipment_score(session: &Session, room: &Classroom) -> f64 {
    let eq = &room.equipment;
    let all = session.requirements.required_equipment.iter().all(|item| eq.has(item));
    let mut score = if all { 1.0 } else { 0.5 };
    if eq.smart_board {
        score += 0.1;
    }
    if eq.projector {
        score += 0.1;
    }
    if eq.air_conditioning {
        score += 0.05;
    }
    score
}

pub fn room_score(session: &Session, room: &Classroom) -> f64 {
    0.5 * capacity_score(session.enrollment, room.capacity)
        + 0.2 * LOCATION_SCORE
        + 0.3 * equipment_score(session, room).min(1.0)
}

pub fn qualifies(session: &Session, room: &Classroom) -> bool {
    let req = &session.requirements;
    room.capacity >= session.enrollment
        && req.room_type.as_ref().map_or(true, |t| &room.room_type == t)
        && req.required_equipment.iter().all(|item| room.equipment.has(item))
        && (!req.accessibility_needed || room.accessibility.wheelchair_accessible)
}

/// Reassigns classrooms within each timeslot bucket. Timeslots never change.
/// A session with no qualifying free room keeps its original classroom, even
/// if that reintroduces a violation.
pub fn allocate(snap: &Snapshot, ch: &Chromosome) -> Chromosome {
    let mut out = ch.clone();

    let mut buckets: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, g) in ch.genes.iter().enumerate() {
        buckets.entry(g.timeslot).or_default().push(i);
    }

    for members in buckets.values_mut() {
        // stable: equal priorities keep session order
        members.sort_by_key(|&i| std::cmp::Reverse(priority(&snap.sessions[i])));
        let mut used: HashSet<usize> = HashSet::new();

        for &i in members.iter() {
            let session = &snap.sessions[i];
            let mut best: Option<(usize, f64)> = None;
            for (r, room) in snap.classrooms.iter().enumerate() {
                if used.contains(&r) || !qualifies(session, room) {
                    continue;
                }
                let score = room_score(session, room);
                if best.map_or(true, |(_, s)| score > s) {
                    best = Some((r, score));
                }
            }
            if let Some((r, _)) = best {
                out.genes[i].classroom = r;
                used.insert(r);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sched_core::testkit::*;
    use sched_core::Gene;

    fn lone_session(enrollment: u32) -> Session {
        let snap = Snapshot::load(
            &request(
                vec![subject("a", 1, enrollment, &["f1"])],
                vec![faculty("f1")],
                vec![classroom("r1", 40)],
                week_slots(1),
            ),
            day(),
        )
        .unwrap();
        snap.sessions[0].clone()
    }

    #[test]
    fn capacity_score_boundaries() {
        assert_eq!(capacity_score(80, 100), 1.0);
        assert_eq!(capacity_score(100, 100), 1.0);
        assert_eq!(capacity_score(101, 100), 0.0);
        assert_eq!(capacity_score(50, 100), 0.5);
    }

    #[test]
    fn laboratory_with_equipment_outranks_bigger_lecture() {
        let mut lab = lone_session(30);
        lab.requirements.room_type = Some(RoomType::Laboratory);
        lab.requirements.required_equipment = vec!["microscope".into(), "fume hood".into()];
        let lecture = lone_session(40);
        // 30*10 + 2*50 + 100
        assert_eq!(priority(&lab), 500);
        assert_eq!(priority(&lecture), 400);
        assert!(priority(&lab) > priority(&lecture));
    }

    #[test]
    fn equipment_bonus_is_capped_in_room_score() {
        let s = lone_session(40);
        let mut room = classroom("r", 50);
        room.equipment.smart_board = true;
        room.equipment.projector = true;
        room.equipment.air_conditioning = true;
        assert!((equipment_score(&s, &room) - 1.25).abs() < 1e-12);
        assert!((room_score(&s, &room) - (0.5 + 0.16 + 0.3)).abs() < 1e-12);
    }

    #[test]
    fn qualification_checks_every_requirement() {
        let mut s = lone_session(30);
        s.requirements.required_equipment = vec!["projector".into()];
        s.requirements.accessibility_needed = true;
        let mut room = classroom("r", 40);
        assert!(!qualifies(&s, &room));
        room.equipment.projector = true;
        assert!(!qualifies(&s, &room));
        room.accessibility.wheelchair_accessible = true;
        assert!(qualifies(&s, &room));
        room.capacity = 20;
        assert!(!qualifies(&s, &room));
    }

    #[test]
    fn allocates_best_fitting_free_rooms_per_slot() {
        let req = request(
            vec![subject("big", 1, 90, &["f1"]), subject("small", 1, 35, &["f2"])],
            vec![faculty("f1"), faculty("f2")],
            vec![classroom("hall", 100), classroom("room", 40), classroom("tiny", 10)],
            week_slots(1),
        );
        let snap = Snapshot::load(&req, day()).unwrap();
        let ch = Chromosome {
            genes: vec![
                Gene {
                    timeslot: 0,
                    classroom: 2,
                },
                Gene {
                    timeslot: 0,
                    classroom: 2,
                },
            ],
        };
        let out = allocate(&snap, &ch);
        assert_eq!(out.genes[0].classroom, 0);
        assert_eq!(out.genes[1].classroom, 1);
        assert_eq!(out.genes[0].timeslot, 0);
    }

    #[test]
    fn falls_back_to_original_room_when_nothing_fits() {
        let req = request(
            vec![subject("a", 1, 30, &["f1"]), subject("b", 1, 30, &["f2"])],
            vec![faculty("f1"), faculty("f2")],
            vec![classroom("r1", 40), classroom("r2", 10)],
            week_slots(1),
        );
        let snap = Snapshot::load(&req, day()).unwrap();
        let ch = Chromosome {
            genes: vec![
                Gene {
                    timeslot: 0,
                    classroom: 1,
                },
                Gene {
                    timeslot: 0,
                    classroom: 1,
                },
            ],
        };
        let out = allocate(&snap, &ch);
        // a takes r1, b has nothing left and keeps r2
        assert_eq!(out.genes[0].classroom, 0);
        assert_eq!(out.genes[1].classroom, 1);
    }
}
