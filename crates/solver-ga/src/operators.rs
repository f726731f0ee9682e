//! Selection, crossover and mutation.

use rand::Rng;
use sched_core::{Chromosome, ChromosomeError, Dims, Gene};

use crate::error::BreedError;

/// A chromosome with its evaluated fitness.
#[derive(Clone, Debug)]
pub struct Scored {
    pub chromosome: Chromosome,
    pub fitness: f64,
}

/// Draws `k` members uniformly (with replacement) and keeps the fittest.
pub fn tournament<'a, R: Rng + ?Sized>(
    pop: &'a [Scored],
    k: usize,
    rng: &mut R,
) -> Result<&'a Scored, BreedError> {
    if pop.is_empty() {
        return Err(BreedError::EmptyPopulation);
    }
    let mut best: Option<&Scored> = None;
    for _ in 0..k.max(1) {
        let c = &pop[rng.gen_range(0..pop.len())];
        if best.map_or(true, |b| c.fitness > b.fitness) {
            best = Some(c);
        }
    }
    best.ok_or(BreedError::EmptyPopulation)
}

/// Children of a two-point splice at cut points `a <= b`: genes in `a..b`
/// are swapped between the parents.
pub fn crossover_at(
    p1: &Chromosome,
    p2: &Chromosome,
    a: usize,
    b: usize,
) -> (Chromosome, Chromosome) {
    let mut c1 = p1.clone();
    let mut c2 = p2.clone();
    c1.genes[a..b].copy_from_slice(&p2.genes[a..b]);
    c2.genes[a..b].copy_from_slice(&p1.genes[a..b]);
    (c1, c2)
}

/// Two-point crossover applied with probability `rate`; otherwise the
/// children are copies of the parents.
pub fn two_point_crossover<R: Rng + ?Sized>(
    p1: &Chromosome,
    p2: &Chromosome,
    rate: f64,
    rng: &mut R,
) -> Result<(Chromosome, Chromosome), ChromosomeError> {
    if p1.len() != p2.len() {
        return Err(ChromosomeError::LengthMismatch {
            expected: p1.len(),
            actual: p2.len(),
        });
    }
    if rng.gen::<f64>() >= rate || p1.len() < 2 {
        return Ok((p1.clone(), p2.clone()));
    }
    let mut a = rng.gen_range(0..=p1.len());
    let mut b = rng.gen_range(0..=p1.len());
    if a > b {
        std::mem::swap(&mut a, &mut b);
    }
    Ok(crossover_at(p1, p2, a, b))
}

/// Redraws each gene independently with probability `rate`.
pub fn mutate<R: Rng + ?Sized>(ch: &mut Chromosome, dims: Dims, rate: f64, rng: &mut R) -> usize {
    let mut mutated = 0;
    for g in ch.genes.iter_mut() {
        if rng.gen::<f64>() < rate {
            *g = Gene::random(dims, rng);
            mutated += 1;
        }
    }
    mutated
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const DIMS: Dims = Dims {
        sessions: 8,
        timeslots: 20,
        classrooms: 5,
    };

    fn scored(fitness: f64) -> Scored {
        Scored {
            chromosome: Chromosome { genes: vec![] },
            fitness,
        }
    }

    #[test]
    fn tournament_of_whole_population_size_tends_to_best() {
        let pop = vec![scored(0.1), scored(0.9), scored(0.5)];
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let picked = tournament(&pop, 50, &mut rng).unwrap();
        assert_eq!(picked.fitness, 0.9);
    }

    #[test]
    fn tournament_rejects_empty_population() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            tournament(&[], 3, &mut rng).unwrap_err(),
            BreedError::EmptyPopulation
        );
    }

    #[test]
    fn zero_rate_crossover_returns_parents() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let p1 = Chromosome::random(DIMS, &mut rng);
        let p2 = Chromosome::random(DIMS, &mut rng);
        for _ in 0..20 {
            let (c1, c2) = two_point_crossover(&p1, &p2, 0.0, &mut rng).unwrap();
            assert_eq!(c1, p1);
            assert_eq!(c2, p2);
        }
    }

    #[test]
    fn full_rate_crossover_is_an_exact_splice() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..50 {
            let p1 = Chromosome::random(DIMS, &mut rng);
            let p2 = Chromosome::random(DIMS, &mut rng);
            let (c1, c2) = two_point_crossover(&p1, &p2, 1.0, &mut rng).unwrap();
            assert_eq!(c1.len(), DIMS.sessions);
            assert_eq!(c2.len(), DIMS.sessions);
            let n = DIMS.sessions;
            let found = (0..=n)
                .flat_map(|a| (a..=n).map(move |b| (a, b)))
                .any(|(a, b)| crossover_at(&p1, &p2, a, b) == (c1.clone(), c2.clone()));
            assert!(found, "children are not a two-point splice of the parents");
        }
    }

    #[test]
    fn crossover_at_swaps_middle_segment() {
        let g = |t| Gene {
            timeslot: t,
            classroom: 0,
        };
        let p1 = Chromosome {
            genes: vec![g(0), g(1), g(2), g(3)],
        };
        let p2 = Chromosome {
            genes: vec![g(10), g(11), g(12), g(13)],
        };
        let (c1, c2) = crossover_at(&p1, &p2, 1, 3);
        assert_eq!(c1.genes, vec![g(0), g(11), g(12), g(3)]);
        assert_eq!(c2.genes, vec![g(10), g(1), g(2), g(13)]);
    }

    #[test]
    fn crossover_rejects_unequal_parents() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let p1 = Chromosome::random(DIMS, &mut rng);
        let p2 = Chromosome { genes: vec![] };
        assert!(two_point_crossover(&p1, &p2, 1.0, &mut rng).is_err());
    }

    #[test]
    fn mutation_rate_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let original = Chromosome::random(DIMS, &mut rng);
        let mut ch = original.clone();
        assert_eq!(mutate(&mut ch, DIMS, 0.0, &mut rng), 0);
        assert_eq!(ch, original);
        assert_eq!(mutate(&mut ch, DIMS, 1.0, &mut rng), DIMS.sessions);
        assert!(ch.check_bounds(DIMS).is_ok());
    }
}
