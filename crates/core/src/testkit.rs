//! Fixture builders shared by the unit and integration tests.

use chrono::NaiveDate;
use types::{
    AvailabilitySlot, Classroom, ClassroomId, EngineConfig, Faculty, FacultyId, GenerateRequest,
    RoomRequirements, RoomType, Subject, SubjectId, Timeslot, TimeslotId, Weekday,
};

pub const WEEK: [(Weekday, &str); 5] = [
    (Weekday::Monday, "mon"),
    (Weekday::Tuesday, "tue"),
    (Weekday::Wednesday, "wed"),
    (Weekday::Thursday, "thu"),
    (Weekday::Friday, "fri"),
];

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 5).unwrap_or_default()
}

pub fn subject(id: &str, classes_per_week: u32, enrollment: u32, faculty: &[&str]) -> Subject {
    Subject {
        id: SubjectId::from(id),
        name: None,
        department: "CS".into(),
        semester: 1,
        program: None,
        classes_per_week,
        enrollment,
        room_requirements: RoomRequirements::default(),
        assigned_faculty: faculty.iter().map(|f| FacultyId::from(*f)).collect(),
        is_active: true,
    }
}

/// Available 08:00-18:00 every weekday, no preferences, no leave.
pub fn faculty(id: &str) -> Faculty {
    Faculty {
        id: FacultyId::from(id),
        name: None,
        department: Some("CS".into()),
        availability: WEEK
            .iter()
            .map(|(d, _)| AvailabilitySlot {
                day: *d,
                start_time: "08:00".into(),
                end_time: "18:00".into(),
                is_available: true,
            })
            .collect(),
        leaves: vec![],
        preferences: Default::default(),
    }
}

pub fn classroom(id: &str, capacity: u32) -> Classroom {
    Classroom {
        id: ClassroomId::from(id),
        name: None,
        building: None,
        capacity,
        room_type: RoomType::Lecture,
        equipment: Default::default(),
        accessibility: Default::default(),
    }
}

/// `per_day` one-hour slots from 09:00 on each weekday, ids `mon-0`, `mon-1`, ...
pub fn week_slots(per_day: usize) -> Vec<Timeslot> {
    let mut out = Vec::new();
    for (d, short) in WEEK {
        for k in 0..per_day {
            out.push(Timeslot {
                id: TimeslotId(format!("{short}-{k}")),
                day: d,
                start_time: format!("{:02}:00", 9 + k),
                end_time: format!("{:02}:00", 10 + k),
            });
        }
    }
    out
}

pub fn request(
    subjects: Vec<Subject>,
    faculty: Vec<Faculty>,
    classrooms: Vec<Classroom>,
    timeslots: Vec<Timeslot>,
) -> GenerateRequest {
    GenerateRequest {
        department: "CS".into(),
        semester: 1,
        program: None,
        subjects,
        faculty,
        classrooms,
        timeslots,
        config: EngineConfig {
            seed: Some(7),
            ..Default::default()
        },
    }
}
