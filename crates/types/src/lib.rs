use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Wire shapes a reference may arrive in: a bare id, or the referenced record
/// itself with its id under `id` or `_id`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRef {
    Str(String),
    Num(u64),
    Populated {
        #[serde(alias = "_id")]
        id: RawScalar,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Str(String),
    Num(u64),
}

impl RawRef {
    fn into_id(self) -> String {
        match self {
            RawRef::Str(s) => s,
            RawRef::Num(n) => n.to_string(),
            RawRef::Populated { id: RawScalar::Str(s) } => s,
            RawRef::Populated { id: RawScalar::Num(n) } => n.to_string(),
        }
    }
}

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Clone, Debug, Serialize, ToSchema, JsonSchema, Eq, PartialEq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                RawRef::deserialize(d).map(|r| $name(r.into_id()))
            }
        }
    };
}
id_newtype!(FacultyId);
id_newtype!(ClassroomId);
id_newtype!(SubjectId);
id_newtype!(TimeslotId);
id_newtype!(SessionId);
id_newtype!(TimetableId);

impl SessionId {
    pub fn from_index(i: usize) -> Self {
        Self(format!("S{i}"))
    }
}

#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    #[serde(alias = "Monday", alias = "mon", alias = "Mon")]
    Monday,
    #[serde(alias = "Tuesday", alias = "tue", alias = "Tue")]
    Tuesday,
    #[serde(alias = "Wednesday", alias = "wed", alias = "Wed")]
    Wednesday,
    #[serde(alias = "Thursday", alias = "thu", alias = "Thu")]
    Thursday,
    #[serde(alias = "Friday", alias = "fri", alias = "Fri")]
    Friday,
    #[serde(alias = "Saturday", alias = "sat", alias = "Sat")]
    Saturday,
    #[serde(alias = "Sunday", alias = "sun", alias = "Sun")]
    Sunday,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Lecture,
    #[serde(alias = "lab")]
    Laboratory,
    Seminar,
    Tutorial,
    Auditorium,
    ComputerLab,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoomRequirements {
    #[serde(default)]
    pub room_type: Option<RoomType>,
    #[serde(default)]
    pub required_equipment: Vec<String>,
    #[serde(default)]
    pub accessibility_needed: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: SubjectId,
    #[serde(default)]
    pub name: Option<String>,
    pub department: String,
    pub semester: u32,
    #[serde(default)]
    pub program: Option<String>,
    pub classes_per_week: u32,
    pub enrollment: u32,
    #[serde(default)]
    pub room_requirements: RoomRequirements,
    #[serde(default)]
    pub assigned_faculty: Vec<FacultyId>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    pub day: Weekday,
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Leave {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: LeaveStatus,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FacultyPreferences {
    #[serde(default)]
    pub preferred_days: Vec<Weekday>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    pub id: FacultyId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub availability: Vec<AvailabilitySlot>,
    #[serde(default)]
    pub leaves: Vec<Leave>,
    #[serde(default)]
    pub preferences: FacultyPreferences,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    #[serde(default)]
    pub smart_board: bool,
    #[serde(default)]
    pub projector: bool,
    #[serde(default)]
    pub air_conditioning: bool,
    #[serde(default)]
    pub computers: bool,
    #[serde(default)]
    pub audio_system: bool,
    #[serde(default)]
    pub whiteboard: bool,
    #[serde(default)]
    pub specialized_equipment: Vec<String>,
}

impl Equipment {
    /// Looks an item up by flag name (`smartBoard`, `smart_board`, `smart board`
    /// all match) and falls back to the specialized-equipment list.
    pub fn has(&self, item: &str) -> bool {
        let key: String = item
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let flag = match key.as_str() {
            "smartboard" => Some(self.smart_board),
            "projector" => Some(self.projector),
            "airconditioning" | "ac" => Some(self.air_conditioning),
            "computers" | "computer" => Some(self.computers),
            "audiosystem" => Some(self.audio_system),
            "whiteboard" => Some(self.whiteboard),
            _ => None,
        };
        if flag == Some(true) {
            return true;
        }
        self.specialized_equipment
            .iter()
            .any(|e| e.eq_ignore_ascii_case(item.trim()))
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Accessibility {
    #[serde(default)]
    pub wheelchair_accessible: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Classroom {
    pub id: ClassroomId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    pub capacity: u32,
    pub room_type: RoomType,
    #[serde(default)]
    pub equipment: Equipment,
    #[serde(default)]
    pub accessibility: Accessibility,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Timeslot {
    pub id: TimeslotId,
    pub day: Weekday,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FitnessWeights {
    pub utilization: f64,
    pub balance: f64,
    pub preference: f64,
    pub penalty: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            utilization: 0.3,
            balance: 0.3,
            preference: 0.2,
            penalty: 0.2,
        }
    }
}

/// Engine tuning. Every field is optional on the wire.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub population_size: usize,
    pub max_generations: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub convergence_threshold: f64,
    /// Fraction of each generation carried over unchanged.
    pub elite_ratio: f64,
    pub tournament_size: usize,
    /// Generations without a new best before the run is declared converged.
    pub stall_generations: usize,
    pub repair_attempts: usize,
    pub fitness_weights: FitnessWeights,
    /// Absent: a fresh seed is drawn and reported in the run stats.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 100,
            mutation_rate: 0.1,
            crossover_rate: 0.8,
            convergence_threshold: 0.95,
            elite_ratio: 0.2,
            tournament_size: 3,
            stall_generations: 20,
            repair_attempts: 100,
            fitness_weights: FitnessWeights::default(),
            seed: None,
        }
    }
}

/// Everything one optimization run reads: the scope it schedules and the
/// collaborator snapshot.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub department: String,
    pub semester: u32,
    #[serde(default)]
    pub program: Option<String>,
    pub subjects: Vec<Subject>,
    pub faculty: Vec<Faculty>,
    pub classrooms: Vec<Classroom>,
    pub timeslots: Vec<Timeslot>,
    #[serde(default)]
    pub config: EngineConfig,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    FacultyConflict,
    RoomConflict,
    CapacityViolation,
    FacultyUnavailable,
    RoomTypeMismatch,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ViolationKind::FacultyConflict => "faculty_conflict",
            ViolationKind::RoomConflict => "room_conflict",
            ViolationKind::CapacityViolation => "capacity_violation",
            ViolationKind::FacultyUnavailable => "faculty_unavailable",
            ViolationKind::RoomTypeMismatch => "room_type_mismatch",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    pub session_id: SessionId,
    /// Position of the session in the chromosome.
    pub session_index: usize,
    pub message: String,
    /// Names of the offending fields, e.g. `facultyId`, `timeslotId`.
    pub fields: Vec<String>,
    pub details: serde_json::Value,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FitnessBreakdown {
    pub utilization: f64,
    pub balance: f64,
    pub preference: f64,
    pub penalty: f64,
    pub fitness: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub session_count: usize,
    pub utilization_pct: f64,
    pub balance_pct: f64,
    pub conflict_count: usize,
    pub preference_satisfaction_pct: f64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TerminationState {
    Converged,
    Exhausted,
}

/// One scheduled session, resolved to collaborator ids.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub session_id: SessionId,
    pub faculty_id: FacultyId,
    pub subject_id: SubjectId,
    pub classroom_id: ClassroomId,
    pub timeslot_id: TimeslotId,
    pub semester: u32,
    pub department: String,
    #[serde(default)]
    pub program: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub seed: u64,
    pub best_ga_fitness: f64,
    pub residual_violations: usize,
    pub failed_evaluations: usize,
    pub failed_breedings: usize,
    pub swallowed_repairs: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOutcome {
    pub department: String,
    pub semester: u32,
    #[serde(default)]
    pub program: Option<String>,
    pub placements: Vec<Placement>,
    pub violations: Vec<Violation>,
    pub metrics: Metrics,
    pub fitness: f64,
    pub generations: usize,
    pub termination: TerminationState,
    pub stats: RunStats,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    pub id: String,
    pub faculty_id: FacultyId,
    pub subject_id: SubjectId,
    pub classroom_id: ClassroomId,
    pub timeslot_id: TimeslotId,
    pub semester: u32,
    pub department: String,
    #[serde(default)]
    pub program: Option<String>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TimetableStatus {
    Draft,
    Approved,
    Published,
}

/// A persisted timetable. Entry ids are `"{id}-{n}"`.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Timetable {
    pub id: TimetableId,
    pub department: String,
    pub semester: u32,
    #[serde(default)]
    pub program: Option<String>,
    pub status: TimetableStatus,
    pub entries: Vec<TimetableEntry>,
    pub metrics: Metrics,
    pub fitness: f64,
    pub generations: usize,
    pub created_at: DateTime<Utc>,
}

impl Timetable {
    pub fn from_outcome(id: TimetableId, outcome: &ScheduleOutcome, created_at: DateTime<Utc>) -> Self {
        let entries = outcome
            .placements
            .iter()
            .enumerate()
            .map(|(n, p)| TimetableEntry {
                id: format!("{}-{}", id.0, n),
                faculty_id: p.faculty_id.clone(),
                subject_id: p.subject_id.clone(),
                classroom_id: p.classroom_id.clone(),
                timeslot_id: p.timeslot_id.clone(),
                semester: p.semester,
                department: p.department.clone(),
                program: p.program.clone(),
            })
            .collect();
        Self {
            id,
            department: outcome.department.clone(),
            semester: outcome.semester,
            program: outcome.program.clone(),
            status: TimetableStatus::Draft,
            entries,
            metrics: outcome.metrics.clone(),
            fitness: outcome.fitness,
            generations: outcome.generations,
            created_at,
        }
    }
}
