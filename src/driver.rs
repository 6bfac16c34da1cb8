use std::time::Instant;

use crate::config::Config;
use crate::error::{Result, SearchError};
use crate::fitness::AreaFitness;
use crate::layout::{self, Layout, RectSpec};
use crate::search::encoding::{decode_onto, encode_rects, BoundedJitter, Gene};
use crate::search::{GeneticAlgorithm, Passthrough, Population, SearchEngine};

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub layout: Layout,
    /// Sizes chosen by the search, in input order, before orientation
    pub sizes: Vec<RectSpec>,
    pub best_fitness: f64,
    pub generations: usize,
    pub evaluations: u64,
}

/// Validate `config`, run the configured search and pack its best candidate.
///
/// Sizes may only shrink by up to `size_tolerance` unless
/// `search.allow_growth` is set; the declared sizes then remain the best
/// candidate and the run packs whenever they do.
pub fn run(config: &Config) -> Result<RunReport> {
    let seed = prepare(config)?;

    if !config.search.enabled {
        return search_and_pack(config, seed, &mut Passthrough);
    }

    let tolerance = config.search.size_tolerance;
    let mutator = if config.search.allow_growth {
        BoundedJitter::around(&seed, tolerance)
    } else {
        BoundedJitter::shrink_only(&seed, tolerance)
    };
    let mut engine = GeneticAlgorithm::new(config.search.ga, mutator);
    search_and_pack(config, seed, &mut engine)
}

/// Run one search with `engine`, then pack the top-ranked candidate in input order.
///
/// Fails with the first error from validation, the engine, or the packing
/// pass. A failed pass yields no layout at all.
pub fn run_with<E>(config: &Config, engine: &mut E) -> Result<RunReport>
where
    E: SearchEngine + ?Sized,
{
    let seed = prepare(config)?;
    search_and_pack(config, seed, engine)
}

/// Validate once and encode the declared sizes as the seed candidate.
fn prepare(config: &Config) -> Result<Vec<Gene>> {
    if let Err(e) = config.validate() {
        tracing::error!("Rejected configuration: {}", e);
        return Err(e.into());
    }
    tracing::debug!(
        "Configuration valid: {} rectangles, container {}x{}, margin {}",
        config.rects.len(),
        config.container.width,
        config.container.height,
        config.margin
    );
    Ok(encode_rects(&config.rects)?)
}

fn search_and_pack<E>(config: &Config, seed: Vec<Gene>, engine: &mut E) -> Result<RunReport>
where
    E: SearchEngine + ?Sized,
{
    let fitness = AreaFitness::new(config.container);
    let termination = config.search.termination;
    let started = Instant::now();

    tracing::info!(
        "Searching sizes for {} rectangles in {}x{} container (margin={}, seed fitness={:.4})",
        seed.len(),
        config.container.width,
        config.container.height,
        config.margin,
        fitness.evaluate(&seed)
    );

    let evaluate = |genes: &[Gene]| fitness.evaluate(genes);
    let terminate = |_: &Population, generation: usize, evaluations: u64| {
        termination.should_stop(started, generation, evaluations)
    };
    let outcome = engine.search(Population::seeded(seed), &evaluate, &terminate)?;

    let reason = termination
        .reason(started, outcome.generations, outcome.evaluations)
        .unwrap_or("engine finished");
    tracing::info!(
        "Search stopped ({}) after {} generations, {} evaluations, {:.1} ms",
        reason,
        outcome.generations,
        outcome.evaluations,
        started.elapsed().as_secs_f64() * 1000.0
    );

    let best = outcome
        .population
        .best()
        .ok_or(SearchError::EmptyPopulation)?;
    if best.genes.len() != config.rects.len() {
        return Err(SearchError::LengthMismatch {
            expected: config.rects.len(),
            found: best.genes.len(),
        }
        .into());
    }
    let best_fitness = best.score();
    let sizes = decode_onto(&best.genes, &config.rects);

    let layout = layout::pack(
        config.container.width,
        config.container.height,
        &sizes,
        &config.pack_options(),
    )?;

    tracing::info!(
        "Packed {} rectangles, best fitness {:.4}, coverage {:.1}%",
        layout.rects.len(),
        best_fitness,
        layout.coverage() * 100.0
    );

    Ok(RunReport {
        layout,
        sizes,
        best_fitness,
        generations: outcome.generations,
        evaluations: outcome.evaluations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, Error, PackError};
    use crate::fitness::Container;
    use crate::search::{FitnessFn, SearchOutcome, TerminateFn};

    fn fixed_config() -> Config {
        let mut config = Config::default();
        config.allow_rotation = false;
        config.search.enabled = false;
        config
    }

    #[test]
    fn declared_sizes_pack_deterministically() {
        let config = fixed_config();
        let a = run(&config).unwrap();
        let b = run(&config).unwrap();
        assert_eq!(a.layout.rects, b.layout.rects);
        assert_eq!(a.generations, 0);
        assert_eq!(a.sizes, config.rects);
        assert!((a.best_fitness - 0.475).abs() < 1e-12);
        assert_eq!((a.layout.rects[5].x, a.layout.rects[5].y), (0.0, 145.0));
        assert_eq!(a.layout.rects[2].label, "front");
    }

    #[test]
    fn zero_tolerance_search_keeps_declared_sizes() {
        let mut config = Config::default();
        config.search.size_tolerance = 0.0;
        config.search.termination.max_generations = 5;
        config.search.ga.seed = Some(11);

        let report = run(&config).unwrap();
        assert_eq!(report.generations, 5);
        assert_eq!(report.sizes, config.rects);
        assert!(report.layout.overlapping_pairs().is_empty());
        assert!(report.layout.out_of_bounds().is_empty());
    }

    #[test]
    fn default_search_always_packs_reference_boxes() {
        for seed in [1, 5, 42, 1234] {
            let mut config = Config::default();
            config.search.ga.seed = Some(seed);
            config.search.termination.max_generations = 20;

            let report = run(&config).unwrap();
            assert_eq!(report.generations, 20);
            // Shrink-only bounds leave the declared sizes as the largest candidate
            assert_eq!(report.sizes, config.rects);
            assert!(report.best_fitness >= 0.475 - 1e-12);
            assert_eq!(report.layout.rects.len(), 6);
            assert!(report.layout.overlapping_pairs().is_empty());
            assert!(report.layout.out_of_bounds().is_empty());
        }
    }

    #[test]
    fn growth_search_stays_within_tolerance() {
        let mut config = Config::default();
        config.container = Container::new(400.0, 400.0);
        config.search.allow_growth = true;
        config.search.size_tolerance = 0.05;
        config.search.ga.seed = Some(5);
        config.search.termination.max_generations = 20;

        let seed = encode_rects(&config.rects).unwrap();
        let seed_fitness = AreaFitness::new(config.container).evaluate(&seed);
        let jitter = BoundedJitter::around(&seed, config.search.size_tolerance);

        let report = run(&config).unwrap();
        assert!(report.best_fitness >= seed_fitness);
        for (i, size) in report.sizes.iter().enumerate() {
            let gene = Gene::encode(size.width as u16, size.height as u16);
            assert!(jitter.bounds[i].contains(gene));
        }
        assert!(report.layout.overlapping_pairs().is_empty());
        assert!(report.layout.out_of_bounds().is_empty());
    }

    /// Engine that grows every side of every candidate by one.
    struct Growing;

    impl SearchEngine for Growing {
        fn search(
            &mut self,
            mut population: Population,
            fitness: &FitnessFn<'_>,
            _terminate: &TerminateFn<'_>,
        ) -> std::result::Result<SearchOutcome, SearchError> {
            for c in &mut population.solutions {
                for gene in &mut c.genes {
                    *gene = Gene::encode(gene.width() + 1, gene.height() + 1);
                }
                c.fitness = Some(fitness(&c.genes));
            }
            Ok(SearchOutcome {
                population,
                generations: 1,
                evaluations: 1,
            })
        }
    }

    #[test]
    fn grown_candidate_that_no_longer_fits_is_a_pack_error() {
        let mut config = fixed_config();
        config.container = Container::new(10.0, 10.0);
        config.margin = 0.0;
        config.rects = vec![RectSpec::new(10.0, 10.0)];
        assert!(run(&config).is_ok());

        assert_eq!(
            run_with(&config, &mut Growing).unwrap_err(),
            Error::Pack(PackError::Infeasible {
                index: 0,
                width: 11.0,
                height: 11.0,
                margin: 0.0,
            })
        );
    }

    #[test]
    fn malformed_config_fails_before_search() {
        let mut config = Config::default();
        config.container = Container::new(10.0, 10.0);
        config.margin = 0.0;
        config.rects = vec![RectSpec::new(20.0, 20.0)];
        assert!(matches!(
            run(&config),
            Err(Error::Config(ConfigError::OversizedRect { index: 0, .. }))
        ));
    }

    #[test]
    fn infeasible_sequence_reports_pack_error() {
        let mut config = fixed_config();
        config.container = Container::new(10.0, 10.0);
        config.margin = 0.0;
        config.rects = vec![RectSpec::new(10.0, 10.0), RectSpec::new(10.0, 10.0)];
        assert_eq!(
            run(&config).unwrap_err(),
            Error::Pack(PackError::Infeasible {
                index: 1,
                width: 10.0,
                height: 10.0,
                margin: 0.0,
            })
        );
    }

    /// Engine that returns candidates one gene short.
    struct Truncating;

    impl SearchEngine for Truncating {
        fn search(
            &mut self,
            mut population: Population,
            fitness: &FitnessFn<'_>,
            _terminate: &TerminateFn<'_>,
        ) -> std::result::Result<SearchOutcome, SearchError> {
            for c in &mut population.solutions {
                c.genes.pop();
                c.fitness = Some(fitness(&c.genes));
            }
            Ok(SearchOutcome {
                population,
                generations: 0,
                evaluations: 1,
            })
        }
    }

    #[test]
    fn short_candidate_is_a_search_error() {
        let err = run_with(&fixed_config(), &mut Truncating).unwrap_err();
        assert_eq!(
            err,
            Error::Search(SearchError::LengthMismatch {
                expected: 6,
                found: 5
            })
        );
    }
}
