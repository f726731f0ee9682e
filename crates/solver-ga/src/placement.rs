use sched_core::{Chromosome, Snapshot};
use types::Placement;

use crate::error::EngineError;

/// Resolves every gene to collaborator ids. Any dangling index or id aborts
/// the conversion; no partial list is returned.
pub fn to_placements(snap: &Snapshot, ch: &Chromosome) -> Result<Vec<Placement>, EngineError> {
    let mut out = Vec::with_capacity(ch.len());
    for (index, g) in ch.genes.iter().enumerate() {
        let session = snap.sessions.get(index).ok_or_else(|| EngineError::MissingReference {
            index,
            kind: "session",
            id: index.to_string(),
            available: snap.sessions.len(),
        })?;
        let timeslot = snap.timeslots.get(g.timeslot).ok_or_else(|| EngineError::MissingReference {
            index,
            kind: "timeslot",
            id: g.timeslot.to_string(),
            available: snap.timeslots.len(),
        })?;
        let classroom = snap.classrooms.get(g.classroom).ok_or_else(|| EngineError::MissingReference {
            index,
            kind: "classroom",
            id: g.classroom.to_string(),
            available: snap.classrooms.len(),
        })?;
        let faculty = session
            .faculty
            .first()
            .filter(|f| snap.faculty_record(f).is_some())
            .ok_or_else(|| EngineError::MissingReference {
                index,
                kind: "faculty",
                id: session
                    .faculty
                    .first()
                    .map(|f| f.0.clone())
                    .unwrap_or_default(),
                available: snap.faculty.len(),
            })?;

        out.push(Placement {
            session_id: session.id.clone(),
            faculty_id: faculty.clone(),
            subject_id: session.subject_id.clone(),
            classroom_id: classroom.id.clone(),
            timeslot_id: timeslot.id.clone(),
            semester: session.semester,
            department: session.department.clone(),
            program: session.program.clone(),
        });
    }
    Ok(out)
}
