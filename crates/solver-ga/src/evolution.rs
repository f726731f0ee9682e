//! Generational loop: evaluate, rank, keep elites, breed, repair.

use rand::Rng;
use sched_core::{init_population, scoring, Chromosome, Snapshot};
use tracing::{debug, warn};
use types::TerminationState;

use crate::error::{BreedError, EngineError};
use crate::operators::{mutate, tournament, two_point_crossover, Scored};
use crate::repair::repair;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvolutionState {
    /// Index of the generation about to be evaluated.
    Running(usize),
    Converged,
    Exhausted,
}

/// Counters of degraded-continue substitutions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Degradations {
    pub failed_evaluations: usize,
    pub failed_breedings: usize,
    pub swallowed_repairs: usize,
}

#[derive(Clone, Debug)]
pub struct EvolutionOutcome {
    pub best: Scored,
    pub generations: usize,
    pub termination: TerminationState,
    pub degradations: Degradations,
}

pub struct Evolution<'a, R: Rng> {
    snap: &'a Snapshot,
    rng: &'a mut R,
    population: Vec<Chromosome>,
    state: EvolutionState,
    incumbent: Option<Scored>,
    stall: usize,
    generations: usize,
    degradations: Degradations,
}

impl<'a, R: Rng> Evolution<'a, R> {
    pub fn new(snap: &'a Snapshot, rng: &'a mut R) -> Result<Self, EngineError> {
        let population = init_population(snap.dims(), snap.config.population_size, rng);
        Self::with_population(snap, rng, population)
    }

    pub fn with_population(
        snap: &'a Snapshot,
        rng: &'a mut R,
        population: Vec<Chromosome>,
    ) -> Result<Self, EngineError> {
        if population.is_empty() {
            return Err(EngineError::EmptyPopulation);
        }
        let state = if snap.config.max_generations == 0 {
            EvolutionState::Exhausted
        } else {
            EvolutionState::Running(0)
        };
        Ok(Self {
            snap,
            rng,
            population,
            state,
            incumbent: None,
            stall: 0,
            generations: 0,
            degradations: Degradations::default(),
        })
    }

    pub fn state(&self) -> EvolutionState {
        self.state
    }

    pub fn incumbent(&self) -> Option<&Scored> {
        self.incumbent.as_ref()
    }

    pub fn population(&self) -> &[Chromosome] {
        &self.population
    }

    fn best_fitness(&self) -> f64 {
        self.incumbent.as_ref().map_or(0.0, |s| s.fitness)
    }

    /// Runs one generation and returns the state after it.
    pub fn step(&mut self) -> EvolutionState {
        let EvolutionState::Running(generation) = self.state else {
            return self.state;
        };
        let cfg = &self.snap.config;

        let mut ranked = self.evaluate_population();
        ranked.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
        self.generations = generation + 1;

        match ranked.first() {
            Some(top) if top.fitness > self.best_fitness() => {
                self.incumbent = Some(top.clone());
                self.stall = 0;
            }
            _ => self.stall += 1,
        }

        debug!(
            generation,
            best = self.best_fitness(),
            top = ranked.first().map_or(0.0, |s| s.fitness),
            stall = self.stall,
            "generation evaluated"
        );

        self.state = if (self.incumbent.is_some() && self.best_fitness() >= cfg.convergence_threshold)
            || self.stall >= cfg.stall_generations
        {
            EvolutionState::Converged
        } else if self.generations >= cfg.max_generations {
            EvolutionState::Exhausted
        } else {
            self.population = self.next_generation(&ranked);
            EvolutionState::Running(self.generations)
        };
        self.state
    }

    pub fn run(mut self) -> Result<EvolutionOutcome, EngineError> {
        while let EvolutionState::Running(_) = self.step() {}
        let termination = match self.state {
            EvolutionState::Converged => TerminationState::Converged,
            _ => TerminationState::Exhausted,
        };
        let best = self.incumbent.ok_or(EngineError::NoIncumbent)?;
        Ok(EvolutionOutcome {
            best,
            generations: self.generations,
            termination,
            degradations: self.degradations,
        })
    }

    fn evaluate_population(&mut self) -> Vec<Scored> {
        let snap = self.snap;
        let failed = &mut self.degradations.failed_evaluations;
        self.population
            .iter()
            .enumerate()
            .map(|(i, ch)| {
                let fitness = scoring::fitness(snap, ch).unwrap_or_else(|e| {
                    warn!(index = i, error = %e, "fitness evaluation failed, scoring 0");
                    *failed += 1;
                    0.0
                });
                Scored {
                    chromosome: ch.clone(),
                    fitness,
                }
            })
            .collect()
    }

    fn next_generation(&mut self, ranked: &[Scored]) -> Vec<Chromosome> {
        let cfg = &self.snap.config;
        let target = cfg.population_size;
        let elites = ((cfg.elite_ratio * target as f64).floor() as usize)
            .max(1)
            .min(ranked.len());

        let mut next: Vec<Chromosome> = Vec::with_capacity(target);
        next.extend(ranked[..elites].iter().map(|s| s.chromosome.clone()));

        while next.len() < target {
            match self.breed(ranked) {
                Ok((c1, c2)) => {
                    next.push(c1);
                    if next.len() < target {
                        next.push(c2);
                    }
                }
                Err(e) => {
                    warn!(error = %e, "breeding failed, inserting a random chromosome");
                    self.degradations.failed_breedings += 1;
                    next.push(Chromosome::random(self.snap.dims(), self.rng));
                }
            }
        }
        next
    }

    fn breed(&mut self, ranked: &[Scored]) -> Result<(Chromosome, Chromosome), BreedError> {
        let cfg = &self.snap.config;
        let dims = self.snap.dims();
        let p1 = tournament(ranked, cfg.tournament_size, self.rng)?;
        let p2 = tournament(ranked, cfg.tournament_size, self.rng)?;
        let (mut c1, mut c2) =
            two_point_crossover(&p1.chromosome, &p2.chromosome, cfg.crossover_rate, self.rng)?;
        mutate(&mut c1, dims, cfg.mutation_rate, self.rng);
        mutate(&mut c2, dims, cfg.mutation_rate, self.rng);
        Ok((self.repaired(c1), self.repaired(c2)))
    }

    fn repaired(&mut self, child: Chromosome) -> Chromosome {
        match repair(self.snap, &child, self.snap.config.repair_attempts, self.rng) {
            Ok((fixed, _)) => fixed,
            Err(e) => {
                warn!(error = %e, "repair failed, keeping unrepaired child");
                self.degradations.swallowed_repairs += 1;
                child
            }
        }
    }
}
