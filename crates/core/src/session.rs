//! Expansion of subjects into atomic weekly sessions.

use crate::error::ValidationError;
use types::{FacultyId, RoomRequirements, SessionId, Subject, SubjectId};

/// One weekly meeting of a subject. A session's position in the expanded list
/// is its gene position in every chromosome of the run.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub subject_id: SubjectId,
    /// Deduplicated, in assignment order. The first entry is the faculty
    /// member reported on the timetable entry.
    pub faculty: Vec<FacultyId>,
    pub enrollment: u32,
    pub requirements: RoomRequirements,
    pub department: String,
    pub semester: u32,
    pub program: Option<String>,
}

impl Session {
    pub fn is_laboratory(&self) -> bool {
        self.requirements.room_type == Some(types::RoomType::Laboratory)
    }
}

/// Emits `classes_per_week` sessions per subject, subject-then-repetition
/// order, ids `S0..`.
pub fn expand_sessions<'a, I>(subjects: I) -> Result<Vec<Session>, ValidationError>
where
    I: IntoIterator<Item = &'a Subject>,
{
    let mut errors = Vec::new();
    let mut sessions = Vec::new();

    for s in subjects {
        if s.assigned_faculty.is_empty() {
            errors.push(format!("subject {} has no assigned faculty", s.id));
            continue;
        }
        if s.classes_per_week == 0 {
            errors.push(format!("subject {} has classesPerWeek=0", s.id));
            continue;
        }
        let mut faculty: Vec<FacultyId> = Vec::with_capacity(s.assigned_faculty.len());
        for f in &s.assigned_faculty {
            if !faculty.contains(f) {
                faculty.push(f.clone());
            }
        }
        for _ in 0..s.classes_per_week {
            sessions.push(Session {
                id: SessionId::from_index(sessions.len()),
                subject_id: s.id.clone(),
                faculty: faculty.clone(),
                enrollment: s.enrollment,
                requirements: s.room_requirements.clone(),
                department: s.department.clone(),
                semester: s.semester,
                program: s.program.clone(),
            });
        }
    }

    if errors.is_empty() && sessions.is_empty() {
        errors.push("no sessions derived from subjects".into());
    }
    if errors.is_empty() {
        Ok(sessions)
    } else {
        Err(ValidationError::Preconditions(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::subject;

    #[test]
    fn expands_per_weekly_count_in_subject_order() {
        let subjects = vec![
            subject("a", 2, 10, &["f1"]),
            subject("b", 1, 10, &["f2"]),
            subject("c", 3, 10, &["f3"]),
        ];
        let sessions = expand_sessions(&subjects).unwrap();
        let ids: Vec<_> = sessions.iter().map(|s| s.id.0.as_str()).collect();
        assert_eq!(ids, ["S0", "S1", "S2", "S3", "S4", "S5"]);
        let subj: Vec<_> = sessions.iter().map(|s| s.subject_id.0.as_str()).collect();
        assert_eq!(subj, ["a", "a", "b", "c", "c", "c"]);
    }

    #[test]
    fn subject_without_faculty_is_fatal() {
        let subjects = vec![subject("a", 2, 10, &[]), subject("b", 1, 10, &[])];
        let err = expand_sessions(&subjects).unwrap_err();
        assert_eq!(
            err.causes(),
            [
                "subject a has no assigned faculty".to_string(),
                "subject b has no assigned faculty".to_string()
            ]
        );
    }

    #[test]
    fn empty_input_is_fatal() {
        let err = expand_sessions(&Vec::<Subject>::new()).unwrap_err();
        assert_eq!(err.causes(), ["no sessions derived from subjects".to_string()]);
    }

    #[test]
    fn duplicate_faculty_refs_collapse() {
        let subjects = vec![subject("a", 1, 10, &["f1", "f1", "f2"])];
        let sessions = expand_sessions(&subjects).unwrap();
        assert_eq!(sessions[0].faculty, vec![FacultyId::from("f1"), FacultyId::from("f2")]);
    }

    #[test]
    fn expansion_is_repeatable() {
        let mut lab = subject("a", 2, 10, &["f1"]);
        lab.room_requirements.room_type = Some(types::RoomType::Laboratory);
        let subjects = vec![lab, subject("b", 1, 10, &["f2"])];
        let first = expand_sessions(&subjects).unwrap();
        assert_eq!(first, expand_sessions(&subjects).unwrap());
        assert_ne!(first[0], first[2]);
        assert!(first[0].is_laboratory());
    }
}
