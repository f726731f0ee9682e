use proptest::prelude::*;
use sched_core::testkit::*;
use sched_core::{Snapshot, Solver};
use solver_ga::{run, EngineError, GaSolver};
use types::{GenerateRequest, RoomType, TerminationState, ViolationKind};

fn department_request() -> GenerateRequest {
    let mut lab = subject("chem-lab", 2, 25, &["f3"]);
    lab.room_requirements.room_type = Some(RoomType::Laboratory);
    lab.room_requirements.required_equipment = vec!["fume hood".into()];

    let mut lab_room = classroom("lab-1", 30);
    lab_room.room_type = RoomType::Laboratory;
    lab_room.equipment.specialized_equipment = vec!["Fume Hood".into()];

    let mut req = request(
        vec![
            subject("algebra", 3, 60, &["f1"]),
            subject("calculus", 2, 45, &["f2"]),
            subject("physics", 2, 35, &["f1", "f2"]),
            lab,
        ],
        vec![faculty("f1"), faculty("f2"), faculty("f3")],
        vec![classroom("hall", 80), classroom("room-a", 50), lab_room],
        week_slots(4),
    );
    req.config.population_size = 20;
    req.config.max_generations = 30;
    req
}

#[test]
fn run_produces_one_placement_per_session() {
    let req = department_request();
    let snap = Snapshot::load(&req, day()).unwrap();
    let out = run(&snap, 42).unwrap();

    assert_eq!(out.placements.len(), 9);
    assert_eq!(out.metrics.session_count, 9);
    assert!(out.generations >= 1 && out.generations <= 30);
    assert!((0.0..=1.0).contains(&out.fitness));
    assert_eq!(out.metrics.conflict_count, out.violations.len());
    assert_eq!(out.stats.residual_violations, out.violations.len());
    assert_eq!(out.stats.seed, 42);
    for (i, p) in out.placements.iter().enumerate() {
        assert_eq!(p.session_id.0, format!("S{i}"));
    }
}

#[test]
fn lab_sessions_end_up_in_the_lab() {
    let req = department_request();
    let snap = Snapshot::load(&req, day()).unwrap();
    let out = run(&snap, 7).unwrap();
    for p in out.placements.iter().filter(|p| p.subject_id.0 == "chem-lab") {
        assert_eq!(p.classroom_id.0, "lab-1");
    }
    assert!(out
        .violations
        .iter()
        .all(|v| v.kind != ViolationKind::RoomTypeMismatch));
}

#[test]
fn same_seed_same_timetable() {
    let req = department_request();
    let snap = Snapshot::load(&req, day()).unwrap();
    let a = run(&snap, 1234).unwrap();
    let b = run(&snap, 1234).unwrap();
    assert_eq!(a.fitness, b.fitness);
    assert_eq!(a.generations, b.generations);
    let ids = |o: &types::ScheduleOutcome| {
        o.placements
            .iter()
            .map(|p| (p.timeslot_id.0.clone(), p.classroom_id.0.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&a), ids(&b));
}

#[test]
fn easy_instance_is_conflict_free() {
    let mut req = request(
        vec![subject("a", 2, 20, &["f1"]), subject("b", 2, 20, &["f2"])],
        vec![faculty("f1"), faculty("f2")],
        vec![classroom("r1", 25), classroom("r2", 25)],
        week_slots(3),
    );
    req.config.population_size = 10;
    req.config.max_generations = 20;
    let snap = Snapshot::load(&req, day()).unwrap();
    let out = run(&snap, 3).unwrap();
    assert!(out.violations.is_empty(), "{:?}", out.violations);
    assert_eq!(out.metrics.conflict_count, 0);
}

#[test]
fn zero_generations_is_fatal() {
    let mut req = department_request();
    req.config.max_generations = 0;
    let snap = Snapshot::load(&req, day()).unwrap();
    assert!(matches!(run(&snap, 1), Err(EngineError::NoIncumbent)));
}

#[tokio::test]
async fn solver_reports_all_missing_inputs() {
    let mut req = department_request();
    req.classrooms.clear();
    req.timeslots.clear();
    let err = GaSolver::new().solve(req).await.unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("classrooms is empty"), "{msg}");
    assert!(msg.contains("timeslots is empty"), "{msg}");
}

#[tokio::test]
async fn solver_draws_a_seed_when_none_is_given() {
    let mut req = department_request();
    req.config.seed = None;
    req.config.max_generations = 3;
    let out = GaSolver::new().solve(req).await.unwrap();
    assert!(matches!(
        out.termination,
        TerminationState::Converged | TerminationState::Exhausted
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn placements_always_reference_snapshot_entities(seed in any::<u64>()) {
        let mut req = department_request();
        req.config.max_generations = 5;
        req.config.population_size = 8;
        let snap = Snapshot::load(&req, day()).unwrap();
        let out = run(&snap, seed).unwrap();
        prop_assert_eq!(out.placements.len(), snap.sessions.len());
        for p in &out.placements {
            prop_assert!(snap.timeslots.iter().any(|t| t.id == p.timeslot_id));
            prop_assert!(snap.classrooms.iter().any(|c| c.id == p.classroom_id));
        }
        prop_assert!((0.0..=1.0).contains(&out.fitness));
    }
}
