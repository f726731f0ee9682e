//! Candidate schedules and the random population initializer.

use rand::Rng;

use crate::error::ChromosomeError;
use crate::snapshot::Dims;

/// Timeslot and classroom assignment of one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Gene {
    pub timeslot: usize,
    pub classroom: usize,
}

impl Gene {
    pub fn random<R: Rng + ?Sized>(dims: Dims, rng: &mut R) -> Self {
        Self {
            timeslot: rng.gen_range(0..dims.timeslots),
            classroom: rng.gen_range(0..dims.classrooms),
        }
    }
}

/// One gene per session, positionally aligned with `Snapshot::sessions`.
///
/// Conflicts are allowed; they are reported as violations, not prevented
/// by the encoding. Each chromosome owns its genes, so cloning yields an
/// independent copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chromosome {
    pub genes: Vec<Gene>,
}

impl Chromosome {
    pub fn random<R: Rng + ?Sized>(dims: Dims, rng: &mut R) -> Self {
        let genes = (0..dims.sessions).map(|_| Gene::random(dims, rng)).collect();
        Self { genes }
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn check_bounds(&self, dims: Dims) -> Result<(), ChromosomeError> {
        if self.genes.len() != dims.sessions {
            return Err(ChromosomeError::LengthMismatch {
                expected: dims.sessions,
                actual: self.genes.len(),
            });
        }
        for (index, g) in self.genes.iter().enumerate() {
            if g.timeslot >= dims.timeslots {
                return Err(ChromosomeError::TimeslotOutOfRange {
                    index,
                    value: g.timeslot,
                    count: dims.timeslots,
                });
            }
            if g.classroom >= dims.classrooms {
                return Err(ChromosomeError::ClassroomOutOfRange {
                    index,
                    value: g.classroom,
                    count: dims.classrooms,
                });
            }
        }
        Ok(())
    }
}

/// `size` chromosomes with every gene drawn uniformly. No validity filtering.
pub fn init_population<R: Rng + ?Sized>(dims: Dims, size: usize, rng: &mut R) -> Vec<Chromosome> {
    (0..size).map(|_| Chromosome::random(dims, rng)).collect()
}
