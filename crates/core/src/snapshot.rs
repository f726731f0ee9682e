//! Immutable per-run snapshot of collaborator data.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveTime};
use tracing::debug;
use types::{
    Classroom, ClassroomId, EngineConfig, Faculty, FacultyId, GenerateRequest, LeaveStatus,
    Subject, Timeslot, TimeslotId, Weekday,
};

use crate::chromosome::Gene;
use crate::error::ValidationError;
use crate::session::{expand_sessions, Session};

/// A parsed weekday time range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Window {
    pub fn contains(&self, other: &Window) -> bool {
        self.day == other.day && self.start <= other.start && other.end <= self.end
    }

    pub fn hours(&self) -> f64 {
        (self.end - self.start).num_minutes() as f64 / 60.0
    }
}

pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

fn parse_window(day: Weekday, start: &str, end: &str) -> Result<Window, String> {
    let (Some(start_t), Some(end_t)) = (parse_time(start), parse_time(end)) else {
        return Err(format!("unparsable time range {start}-{end}"));
    };
    if end_t <= start_t {
        return Err(format!("time range {start}-{end} ends before it starts"));
    }
    Ok(Window {
        day,
        start: start_t,
        end: end_t,
    })
}

/// Availability and leave data for one faculty member, resolved once.
#[derive(Clone, Debug)]
pub struct FacultyRecord {
    pub faculty: Faculty,
    pub windows: Vec<Window>,
    /// An approved leave covers the run date.
    pub on_leave: bool,
}

impl FacultyRecord {
    pub fn has_day(&self, day: Weekday) -> bool {
        self.windows.iter().any(|w| w.day == day)
    }

    pub fn covers(&self, slot: &Window) -> bool {
        self.windows.iter().any(|w| w.contains(slot))
    }

    pub fn prefers(&self, day: Weekday) -> bool {
        self.faculty.preferences.preferred_days.contains(&day)
    }
}

/// The read-only view one optimization run works against. Built once at run
/// start; nothing in it changes while the run is in progress.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub department: String,
    pub semester: u32,
    pub program: Option<String>,
    pub sessions: Vec<Session>,
    pub faculty: Vec<FacultyRecord>,
    pub classrooms: Vec<Classroom>,
    pub timeslots: Vec<Timeslot>,
    /// Parallel to `timeslots`.
    pub slot_windows: Vec<Window>,
    pub config: EngineConfig,
    /// Date leave ranges are checked against.
    pub today: NaiveDate,
    faculty_index: HashMap<FacultyId, usize>,
}

/// Shape of the assignment space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dims {
    pub sessions: usize,
    pub timeslots: usize,
    pub classrooms: usize,
}

impl Snapshot {
    pub fn load_now(req: &GenerateRequest) -> Result<Self, ValidationError> {
        Self::load(req, chrono::Local::now().date_naive())
    }

    pub fn load(req: &GenerateRequest, today: NaiveDate) -> Result<Self, ValidationError> {
        let mut errors: Vec<String> = Vec::new();

        let subjects: Vec<&Subject> = req
            .subjects
            .iter()
            .filter(|s| s.is_active)
            .filter(|s| s.department == req.department && s.semester == req.semester)
            .filter(|s| req.program.is_none() || s.program == req.program)
            .collect();

        if subjects.is_empty() {
            errors.push(format!(
                "no active subjects for department {} semester {}",
                req.department, req.semester
            ));
        }
        if req.faculty.is_empty() {
            errors.push("faculty is empty".into());
        }
        if req.classrooms.is_empty() {
            errors.push("classrooms is empty".into());
        }
        if req.timeslots.is_empty() {
            errors.push("timeslots is empty".into());
        }

        fn chk_unique<'a>(
            name: &str,
            ids: impl Iterator<Item = &'a str>,
            errors: &mut Vec<String>,
        ) {
            let mut seen = HashSet::new();
            for id in ids {
                if !seen.insert(id) {
                    errors.push(format!("duplicate {name} id: {id}"));
                }
            }
        }
        chk_unique("subject", subjects.iter().map(|s| s.id.0.as_str()), &mut errors);
        chk_unique("faculty", req.faculty.iter().map(|f| f.id.0.as_str()), &mut errors);
        chk_unique("classroom", req.classrooms.iter().map(|c| c.id.0.as_str()), &mut errors);
        chk_unique("timeslot", req.timeslots.iter().map(|t| t.id.0.as_str()), &mut errors);

        let faculty_index: HashMap<FacultyId, usize> = req
            .faculty
            .iter()
            .enumerate()
            .map(|(i, f)| (f.id.clone(), i))
            .collect();

        for s in &subjects {
            for f in &s.assigned_faculty {
                if !faculty_index.contains_key(f) {
                    errors.push(format!("subject {} references missing faculty {}", s.id, f));
                }
            }
        }

        let mut slot_windows = Vec::with_capacity(req.timeslots.len());
        for t in &req.timeslots {
            match parse_window(t.day, &t.start_time, &t.end_time) {
                Ok(w) => slot_windows.push(w),
                Err(e) => errors.push(format!("timeslot {}: {e}", t.id)),
            }
        }

        let mut faculty = Vec::with_capacity(req.faculty.len());
        for f in &req.faculty {
            let mut windows = Vec::new();
            for a in f.availability.iter().filter(|a| a.is_available) {
                match parse_window(a.day, &a.start_time, &a.end_time) {
                    Ok(w) => windows.push(w),
                    Err(e) => errors.push(format!("faculty {} availability: {e}", f.id)),
                }
            }
            let on_leave = f.leaves.iter().any(|l| {
                l.status == LeaveStatus::Approved && l.start_date <= today && today <= l.end_date
            });
            faculty.push(FacultyRecord {
                faculty: f.clone(),
                windows,
                on_leave,
            });
        }

        errors.extend(config_problems(&req.config));

        let sessions = match expand_sessions(subjects.iter().copied()) {
            Ok(s) => s,
            Err(e) => {
                // an empty subject list already has its own message
                if !subjects.is_empty() {
                    errors.extend(e.causes().iter().cloned());
                }
                Vec::new()
            }
        };

        if !errors.is_empty() {
            return Err(ValidationError::Preconditions(errors));
        }

        debug!(
            sessions = sessions.len(),
            faculty = faculty.len(),
            classrooms = req.classrooms.len(),
            timeslots = req.timeslots.len(),
            %today,
            "snapshot loaded"
        );

        Ok(Self {
            department: req.department.clone(),
            semester: req.semester,
            program: req.program.clone(),
            sessions,
            faculty,
            classrooms: req.classrooms.clone(),
            timeslots: req.timeslots.clone(),
            slot_windows,
            config: req.config.clone(),
            today,
            faculty_index,
        })
    }

    pub fn dims(&self) -> Dims {
        Dims {
            sessions: self.sessions.len(),
            timeslots: self.timeslots.len(),
            classrooms: self.classrooms.len(),
        }
    }

    pub fn faculty_record(&self, id: &FacultyId) -> Option<&FacultyRecord> {
        self.faculty_index.get(id).map(|&i| &self.faculty[i])
    }

    /// Gene for an externally supplied (timeslot, classroom) id pair.
    pub fn gene_for(&self, timeslot: &TimeslotId, classroom: &ClassroomId) -> Result<Gene, String> {
        let t = self
            .timeslots
            .iter()
            .position(|t| &t.id == timeslot)
            .ok_or_else(|| format!("unknown timeslot {timeslot}"))?;
        let c = self
            .classrooms
            .iter()
            .position(|c| &c.id == classroom)
            .ok_or_else(|| format!("unknown classroom {classroom}"))?;
        Ok(Gene {
            timeslot: t,
            classroom: c,
        })
    }
}

fn config_problems(cfg: &EngineConfig) -> Vec<String> {
    let mut errors = Vec::new();
    if cfg.population_size == 0 {
        errors.push("populationSize must be at least 1".into());
    }
    if cfg.tournament_size == 0 {
        errors.push("tournamentSize must be at least 1".into());
    }
    for (name, v) in [
        ("mutationRate", cfg.mutation_rate),
        ("crossoverRate", cfg.crossover_rate),
        ("eliteRatio", cfg.elite_ratio),
    ] {
        if !(0.0..=1.0).contains(&v) {
            errors.push(format!("{name} must be within [0, 1], got {v}"));
        }
    }
    if !cfg.convergence_threshold.is_finite() {
        errors.push("convergenceThreshold must be a finite number".into());
    }
    let w = &cfg.fitness_weights;
    for (name, v) in [
        ("utilization", w.utilization),
        ("balance", w.balance),
        ("preference", w.preference),
        ("penalty", w.penalty),
    ] {
        if !v.is_finite() || v < 0.0 {
            errors.push(format!("fitness weight {name} must be a non-negative number, got {v}"));
        }
    }
    errors
}

/// Runs every fatal precondition check without keeping the snapshot.
pub fn validate(req: &GenerateRequest) -> Result<(), ValidationError> {
    Snapshot::load_now(req).map(|_| ())
}
