use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::error::SearchError;

use super::encoding::Gene;
use super::{Chromosome, FitnessFn, GeneMutator, Population, SearchEngine, SearchOutcome, TerminateFn};

/// Genetic algorithm parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaConfig {
    /// Pool size; a smaller seed population is topped up with mutants of the seeds
    pub population_size: usize,
    /// Probability that a child is bred by uniform crossover instead of cloned
    pub crossover_rate: f64,
    /// Per-gene mutation probability
    pub mutation_rate: f64,
    /// Best candidates copied unchanged into the next generation
    pub elite_count: usize,
    /// Contestants per tournament selection
    pub tournament_size: usize,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 24,
            crossover_rate: 0.8,
            mutation_rate: 0.1,
            elite_count: 1,
            tournament_size: 3,
            seed: None,
        }
    }
}

/// Generational GA: tournament selection, uniform crossover, per-gene
/// mutation and elitism. Fitness is evaluated in parallel.
pub struct GeneticAlgorithm<M> {
    pub config: GaConfig,
    mutator: M,
    rng: StdRng,
}

impl<M: GeneMutator> GeneticAlgorithm<M> {
    pub fn new(config: GaConfig, mutator: M) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config,
            mutator,
            rng,
        }
    }

    fn mutate(&mut self, genes: &mut [Gene]) {
        for (i, gene) in genes.iter_mut().enumerate() {
            if self.rng.random_bool(self.config.mutation_rate) {
                *gene = self.mutator.mutate(i, *gene, &mut self.rng);
            }
        }
    }

    /// Grow the seed population to `population_size` with mutated copies.
    fn fill(&mut self, population: &mut Population) {
        let seeds = population.len();
        let mut i = 0;
        while population.len() < self.config.population_size {
            let mut genes = population.solutions[i % seeds].genes.clone();
            for (index, gene) in genes.iter_mut().enumerate() {
                *gene = self.mutator.mutate(index, *gene, &mut self.rng);
            }
            population.solutions.push(Chromosome::new(genes));
            i += 1;
        }
    }

    fn tournament<'p>(&mut self, population: &'p Population) -> &'p Chromosome {
        let n = population.len();
        let mut best = &population.solutions[self.rng.random_range(0..n)];
        for _ in 1..self.config.tournament_size.max(1) {
            let contender = &population.solutions[self.rng.random_range(0..n)];
            if contender.score() > best.score() {
                best = contender;
            }
        }
        best
    }

    fn breed(&mut self, population: &Population) -> Population {
        let size = self.config.population_size.max(1);
        let mut next: Vec<Chromosome> = population
            .top(self.config.elite_count.min(size))
            .into_iter()
            .cloned()
            .collect();

        while next.len() < size {
            let first = self.tournament(population).genes.clone();
            let mut genes = if self.rng.random_bool(self.config.crossover_rate) {
                let second = &self.tournament(population).genes;
                first
                    .iter()
                    .zip(second)
                    .map(|(&a, &b)| if self.rng.random_bool(0.5) { a } else { b })
                    .collect()
            } else {
                first
            };
            self.mutate(&mut genes);
            next.push(Chromosome::new(genes));
        }

        Population::new(next)
    }
}

/// Score every unevaluated candidate. Returns how many were scored.
fn evaluate(population: &mut Population, fitness: &FitnessFn<'_>) -> u64 {
    population
        .solutions
        .par_iter_mut()
        .filter(|c| c.fitness.is_none())
        .map(|c| {
            c.fitness = Some(fitness(&c.genes));
            1u64
        })
        .sum()
}

impl<M: GeneMutator> SearchEngine for GeneticAlgorithm<M> {
    fn search(
        &mut self,
        mut population: Population,
        fitness: &FitnessFn<'_>,
        terminate: &TerminateFn<'_>,
    ) -> Result<SearchOutcome, SearchError> {
        let genes = population.validate()?;
        self.fill(&mut population);

        tracing::info!(
            "GA: {} candidates x {} genes, crossover={:.2}, mutation={:.2}, elites={}",
            population.len(),
            genes,
            self.config.crossover_rate,
            self.config.mutation_rate,
            self.config.elite_count
        );

        let mut evaluations = evaluate(&mut population, fitness);
        let mut generation = 0;

        while !terminate(&population, generation, evaluations) {
            population = self.breed(&population);
            evaluations += evaluate(&mut population, fitness);
            generation += 1;

            if let Some(best) = population.best() {
                tracing::debug!(
                    "Generation {}: best fitness {:.6} ({} evaluations)",
                    generation,
                    best.score(),
                    evaluations
                );
            }
        }

        Ok(SearchOutcome {
            population,
            generations: generation,
            evaluations,
        })
    }
}
