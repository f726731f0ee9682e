use sched_core::{ChromosomeError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("initial population is empty")]
    EmptyPopulation,
    #[error("no candidate schedule was ever recorded as best")]
    NoIncumbent,
    #[error("classroom allocation returned {actual} genes for a chromosome of {expected}")]
    AllocationMismatch { expected: usize, actual: usize },
    #[error("entry {index}: missing {kind} {id} (available: {available})")]
    MissingReference {
        index: usize,
        kind: &'static str,
        id: String,
        available: usize,
    },
    #[error(transparent)]
    Chromosome(#[from] ChromosomeError),
}

/// Why one offspring could not be bred.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BreedError {
    #[error("cannot select parents from an empty population")]
    EmptyPopulation,
    #[error(transparent)]
    Chromosome(#[from] ChromosomeError),
}
