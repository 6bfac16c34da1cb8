//! Evolutionary search seam.
//!
//! The packing core only supplies a fitness function and a termination
//! predicate; any [`SearchEngine`] can drive the generations.

pub mod encoding;
pub mod ga;

use std::time::{Duration, Instant};

use rand::rngs::StdRng;

use crate::error::SearchError;

use self::encoding::Gene;

pub use ga::{GaConfig, GeneticAlgorithm};

/// One candidate vector and its score (None until evaluated).
#[derive(Debug, Clone, PartialEq)]
pub struct Chromosome {
    pub genes: Vec<Gene>,
    pub fitness: Option<f64>,
}

impl Chromosome {
    pub fn new(genes: Vec<Gene>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    /// Score used for ranking; unevaluated candidates rank last.
    pub fn score(&self) -> f64 {
        self.fitness.unwrap_or(f64::NEG_INFINITY)
    }
}

/// A pool of fixed-length candidate vectors.
#[derive(Debug, Clone, Default)]
pub struct Population {
    pub solutions: Vec<Chromosome>,
}

impl Population {
    pub fn new(solutions: Vec<Chromosome>) -> Self {
        Self { solutions }
    }

    pub fn seeded(genes: Vec<Gene>) -> Self {
        Self::new(vec![Chromosome::new(genes)])
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// Check the engine preconditions: non-empty, non-empty candidates, equal lengths.
    /// Returns the candidate length.
    pub fn validate(&self) -> Result<usize, SearchError> {
        let first = self.solutions.first().ok_or(SearchError::EmptyPopulation)?;
        let expected = first.genes.len();
        if expected == 0 {
            return Err(SearchError::EmptyCandidate);
        }
        for (index, c) in self.solutions.iter().enumerate().skip(1) {
            if c.genes.len() != expected {
                return Err(SearchError::RaggedPopulation {
                    index,
                    expected,
                    found: c.genes.len(),
                });
            }
        }
        Ok(expected)
    }

    /// Top `n` candidates by fitness, best first. Ties keep population order.
    pub fn top(&self, n: usize) -> Vec<&Chromosome> {
        let mut ranked: Vec<&Chromosome> = self.solutions.iter().collect();
        ranked.sort_by(|a, b| b.score().total_cmp(&a.score()));
        ranked.truncate(n);
        ranked
    }

    pub fn best(&self) -> Option<&Chromosome> {
        self.top(1).into_iter().next()
    }
}

/// Per-gene mutation operator. Knows what a gene means; the engine does not.
pub trait GeneMutator: Sync {
    fn mutate(&self, index: usize, gene: Gene, rng: &mut StdRng) -> Gene;
}

/// Fitness function over a candidate vector. Higher is better.
pub type FitnessFn<'a> = dyn Fn(&[Gene]) -> f64 + Sync + 'a;

/// Termination predicate: `(population, generation, evaluations) -> stop?`.
pub type TerminateFn<'a> = dyn Fn(&Population, usize, u64) -> bool + 'a;

/// Result of a finished run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub population: Population,
    pub generations: usize,
    pub evaluations: u64,
}

/// A pluggable evolutionary search.
pub trait SearchEngine {
    /// Evolve `population` until `terminate` returns true and return the
    /// final, fully evaluated population.
    fn search(
        &mut self,
        population: Population,
        fitness: &FitnessFn<'_>,
        terminate: &TerminateFn<'_>,
    ) -> Result<SearchOutcome, SearchError>;
}

/// Budget for one run. The generation bound always applies; the other caps are optional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Termination {
    pub max_generations: usize,
    pub max_evaluations: Option<u64>,
    pub time_limit: Option<Duration>,
}

impl Default for Termination {
    fn default() -> Self {
        Self {
            max_generations: 100,
            max_evaluations: None,
            time_limit: None,
        }
    }
}

impl Termination {
    pub fn generations(max_generations: usize) -> Self {
        Self {
            max_generations,
            ..Self::default()
        }
    }

    /// Why a run should stop now, if it should.
    pub fn reason(&self, started: Instant, generation: usize, evaluations: u64) -> Option<&'static str> {
        if generation >= self.max_generations {
            return Some("generation bound");
        }
        if self.max_evaluations.is_some_and(|cap| evaluations >= cap) {
            return Some("evaluation cap");
        }
        if self.time_limit.is_some_and(|limit| started.elapsed() >= limit) {
            return Some("time limit");
        }
        None
    }

    pub fn should_stop(&self, started: Instant, generation: usize, evaluations: u64) -> bool {
        self.reason(started, generation, evaluations).is_some()
    }
}

/// Engine that evaluates the seed population and stops without evolving it.
/// Gives deterministic, search-free placement of the declared sizes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl SearchEngine for Passthrough {
    fn search(
        &mut self,
        mut population: Population,
        fitness: &FitnessFn<'_>,
        _terminate: &TerminateFn<'_>,
    ) -> Result<SearchOutcome, SearchError> {
        population.validate()?;
        for c in &mut population.solutions {
            c.fitness = Some(fitness(&c.genes));
        }
        let evaluations = population.len() as u64;
        Ok(SearchOutcome {
            population,
            generations: 0,
            evaluations,
        })
    }
}
