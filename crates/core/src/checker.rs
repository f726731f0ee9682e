//! Hard-constraint scan over a chromosome.

use std::collections::HashMap;

use chrono::NaiveTime;
use serde_json::json;
use types::{FacultyId, Violation, ViolationKind, Weekday};

use crate::chromosome::Chromosome;
use crate::error::ChromosomeError;
use crate::snapshot::Snapshot;

/// Reports every hard-constraint violation of `ch`, grouped by kind in the
/// fixed order faculty conflict, room conflict, capacity, faculty
/// availability, room type. Within a kind, violations follow session order.
/// For conflicts, the later of two clashing sessions is the one reported.
pub fn check(snap: &Snapshot, ch: &Chromosome) -> Result<Vec<Violation>, ChromosomeError> {
    ch.check_bounds(snap.dims())?;

    let mut out = Vec::new();
    faculty_conflicts(snap, ch, &mut out);
    room_conflicts(snap, ch, &mut out);
    capacity(snap, ch, &mut out);
    faculty_unavailable(snap, ch, &mut out);
    room_type(snap, ch, &mut out);
    Ok(out)
}

pub fn count(snap: &Snapshot, ch: &Chromosome) -> Result<usize, ChromosomeError> {
    check(snap, ch).map(|v| v.len())
}

fn violation(
    snap: &Snapshot,
    kind: ViolationKind,
    index: usize,
    message: String,
    fields: &[&str],
    details: serde_json::Value,
) -> Violation {
    Violation {
        kind,
        session_id: snap.sessions[index].id.clone(),
        session_index: index,
        message,
        fields: fields.iter().map(|f| f.to_string()).collect(),
        details,
    }
}

fn slot_key(snap: &Snapshot, timeslot: usize) -> (Weekday, NaiveTime) {
    let w = &snap.slot_windows[timeslot];
    (w.day, w.start)
}

fn faculty_conflicts(snap: &Snapshot, ch: &Chromosome, out: &mut Vec<Violation>) {
    let mut busy: HashMap<(&FacultyId, Weekday, NaiveTime), usize> = HashMap::new();
    for (i, (session, gene)) in snap.sessions.iter().zip(&ch.genes).enumerate() {
        let (day, start) = slot_key(snap, gene.timeslot);
        for f in &session.faculty {
            match busy.get(&(f, day, start)) {
                Some(&other) => out.push(violation(
                    snap,
                    ViolationKind::FacultyConflict,
                    i,
                    format!(
                        "faculty {} is booked for {} and {} at the same time",
                        f, snap.sessions[other].id, session.id
                    ),
                    &["facultyId", "timeslotId"],
                    json!({
                        "facultyId": f,
                        "timeslotId": snap.timeslots[gene.timeslot].id,
                        "conflictsWith": snap.sessions[other].id,
                    }),
                )),
                None => {
                    busy.insert((f, day, start), i);
                }
            }
        }
    }
}

fn room_conflicts(snap: &Snapshot, ch: &Chromosome, out: &mut Vec<Violation>) {
    let mut busy: HashMap<(usize, Weekday, NaiveTime), usize> = HashMap::new();
    for (i, gene) in ch.genes.iter().enumerate() {
        let (day, start) = slot_key(snap, gene.timeslot);
        match busy.get(&(gene.classroom, day, start)) {
            Some(&other) => {
                let room = &snap.classrooms[gene.classroom];
                out.push(violation(
                    snap,
                    ViolationKind::RoomConflict,
                    i,
                    format!(
                        "classroom {} is booked for {} and {} at the same time",
                        room.id, snap.sessions[other].id, snap.sessions[i].id
                    ),
                    &["classroomId", "timeslotId"],
                    json!({
                        "classroomId": room.id,
                        "timeslotId": snap.timeslots[gene.timeslot].id,
                        "conflictsWith": snap.sessions[other].id,
                    }),
                ));
            }
            None => {
                busy.insert((gene.classroom, day, start), i);
            }
        }
    }
}

fn capacity(snap: &Snapshot, ch: &Chromosome, out: &mut Vec<Violation>) {
    for (i, (session, gene)) in snap.sessions.iter().zip(&ch.genes).enumerate() {
        let room = &snap.classrooms[gene.classroom];
        if session.enrollment > room.capacity {
            out.push(violation(
                snap,
                ViolationKind::CapacityViolation,
                i,
                format!(
                    "session {} has {} students but classroom {} seats {}",
                    session.id, session.enrollment, room.id, room.capacity
                ),
                &["classroomId", "enrollment"],
                json!({
                    "classroomId": room.id,
                    "enrollment": session.enrollment,
                    "capacity": room.capacity,
                }),
            ));
        }
    }
}

fn faculty_unavailable(snap: &Snapshot, ch: &Chromosome, out: &mut Vec<Violation>) {
    for (i, (session, gene)) in snap.sessions.iter().zip(&ch.genes).enumerate() {
        let window = &snap.slot_windows[gene.timeslot];
        for f in &session.faculty {
            let Some(rec) = snap.faculty_record(f) else {
                continue;
            };
            let reason = if rec.on_leave {
                "on approved leave"
            } else if !rec.has_day(window.day) {
                "not available on that day"
            } else if !rec.covers(window) {
                "outside declared availability"
            } else {
                continue;
            };
            out.push(violation(
                snap,
                ViolationKind::FacultyUnavailable,
                i,
                format!("faculty {} is {} for session {}", f, reason, session.id),
                &["facultyId", "timeslotId"],
                json!({
                    "facultyId": f,
                    "timeslotId": snap.timeslots[gene.timeslot].id,
                    "reason": reason,
                }),
            ));
        }
    }
}

fn room_type(snap: &Snapshot, ch: &Chromosome, out: &mut Vec<Violation>) {
    for (i, (session, gene)) in snap.sessions.iter().zip(&ch.genes).enumerate() {
        let Some(required) = &session.requirements.room_type else {
            continue;
        };
        let room = &snap.classrooms[gene.classroom];
        if &room.room_type != required {
            out.push(violation(
                snap,
                ViolationKind::RoomTypeMismatch,
                i,
                format!(
                    "session {} needs a {:?} room, classroom {} is {:?}",
                    session.id, required, room.id, room.room_type
                ),
                &["classroomId", "roomType"],
                json!({
                    "classroomId": room.id,
                    "required": required,
                    "actual": room.room_type,
                }),
            ));
        }
    }
}
