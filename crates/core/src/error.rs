use thiserror::Error;

/// Fatal preconditions found while loading a run snapshot. Every cause found
/// is reported, not just the first.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("invalid scheduling input: {}", .0.join("; "))]
    Preconditions(Vec<String>),
}

impl ValidationError {
    pub fn causes(&self) -> &[String] {
        match self {
            ValidationError::Preconditions(v) => v,
        }
    }
}

/// A chromosome that does not fit the snapshot it is checked against.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChromosomeError {
    #[error("chromosome has {actual} genes, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("gene {index}: timeslot index {value} out of range (timeslots: {count})")]
    TimeslotOutOfRange { index: usize, value: usize, count: usize },
    #[error("gene {index}: classroom index {value} out of range (classrooms: {count})")]
    ClassroomOutOfRange { index: usize, value: usize, count: usize },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvaluationError {
    #[error(transparent)]
    Chromosome(#[from] ChromosomeError),
    #[error("{0} score is not a finite number")]
    NonFinite(&'static str),
}
