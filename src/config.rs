use std::time::Duration;

use clap::Parser;

use crate::error::ConfigError;
use crate::fitness::Container;
use crate::layout::{PackOptions, RectSpec};
use crate::search::encoding::Gene;
use crate::search::{GaConfig, Termination};

/// Search settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// When false the declared sizes are packed as-is (no generations run)
    pub enabled: bool,
    pub termination: Termination,
    pub ga: GaConfig,
    /// Fraction each side may shrink (or, with `allow_growth`, grow) during search
    pub size_tolerance: f64,
    /// Allow sides to grow past their declared size. Area fitness then favours
    /// the largest candidate, which may no longer pack.
    pub allow_growth: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            termination: Termination::default(),
            ga: GaConfig::default(),
            size_tolerance: 0.1,
            allow_growth: false,
        }
    }
}

/// Full run configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub container: Container,
    /// Clearance added to both sides of each rectangle
    pub margin: f32,
    pub allow_rotation: bool,
    /// Rectangles in packing priority order
    pub rects: Vec<RectSpec>,
    pub search: SearchConfig,
}

impl Default for Config {
    fn default() -> Self {
        let (box_height, box_length, box_width) = (50.0, 100.0, 30.0);
        Self {
            container: Container::new(200.0, 200.0),
            margin: 5.0,
            allow_rotation: true,
            rects: vec![
                RectSpec::labeled("side-a", box_width, box_height),
                RectSpec::labeled("side-b", box_width, box_height),
                RectSpec::labeled("front", box_length, box_height),
                RectSpec::labeled("back", box_length, box_height),
                RectSpec::labeled("top", box_length, box_width),
                RectSpec::labeled("bottom", box_length, box_width),
            ],
            search: SearchConfig::default(),
        }
    }
}

impl Config {
    pub fn pack_options(&self) -> PackOptions {
        PackOptions {
            margin: self.margin,
            allow_rotation: self.allow_rotation,
        }
    }

    /// Reject anything that would only be discovered mid-run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Container { width, height } = self.container;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::NonPositiveContainer { width, height });
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(ConfigError::InvalidMargin(self.margin));
        }
        if self.rects.is_empty() {
            return Err(ConfigError::NoRectangles);
        }

        let m = self.margin;
        for (index, rect) in self.rects.iter().enumerate() {
            Gene::from_rect(index, rect)?;
            let upright = rect.width + m <= width && rect.height + m <= height;
            let rotated = rect.height + m <= width && rect.width + m <= height;
            if !upright && !(self.allow_rotation && rotated) {
                return Err(ConfigError::OversizedRect {
                    index,
                    width: rect.width,
                    height: rect.height,
                    margin: m,
                });
            }
        }

        let ga = &self.search.ga;
        if ga.population_size < 1 {
            return Err(ConfigError::TooSmall {
                name: "population size",
                value: ga.population_size,
                min: 1,
            });
        }
        if ga.tournament_size < 1 {
            return Err(ConfigError::TooSmall {
                name: "tournament size",
                value: ga.tournament_size,
                min: 1,
            });
        }
        for (name, value) in [
            ("crossover rate", ga.crossover_rate),
            ("mutation rate", ga.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidRate { name, value });
            }
        }
        let tol = self.search.size_tolerance;
        if !(0.0..1.0).contains(&tol) {
            return Err(ConfigError::InvalidTolerance(tol));
        }
        Ok(())
    }
}

/// Command-line arguments. Every flag overrides one default of [`Config`].
#[derive(Parser, Debug, Clone)]
#[command(name = "nestpack", version, about = "Pack rectangles into a fixed container")]
pub struct CliArgs {
    /// Container size
    #[arg(long, value_name = "WxH", value_parser = parse_container)]
    pub container: Option<Container>,

    /// Clearance added to both sides of every rectangle
    #[arg(long)]
    pub margin: Option<f32>,

    /// Rectangle to pack, repeatable; replaces the default rectangles
    #[arg(long = "rect", value_name = "WxH[:label]", value_parser = parse_rect)]
    pub rects: Vec<RectSpec>,

    /// Generation bound of the search
    #[arg(long)]
    pub generations: Option<usize>,

    /// Stop after this many fitness evaluations
    #[arg(long)]
    pub max_evals: Option<u64>,

    /// Stop after this many milliseconds of search
    #[arg(long)]
    pub time_limit_ms: Option<u64>,

    /// Candidates per generation
    #[arg(long)]
    pub population: Option<usize>,

    /// RNG seed for a reproducible search
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fraction each side may deviate from its declared size
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Let the search grow sides past their declared size (may fail to pack)
    #[arg(long)]
    pub allow_growth: bool,

    /// Never rotate rectangles
    #[arg(long)]
    pub no_rotate: bool,

    /// Pack the declared sizes without running a search
    #[arg(long)]
    pub no_search: bool,
}

impl CliArgs {
    /// Apply the flags on top of the defaults.
    pub fn into_config(self) -> Config {
        let mut config = Config::default();
        if let Some(container) = self.container {
            config.container = container;
        }
        if let Some(margin) = self.margin {
            config.margin = margin;
        }
        if !self.rects.is_empty() {
            config.rects = self.rects;
        }

        let search = &mut config.search;
        if let Some(generations) = self.generations {
            search.termination.max_generations = generations;
        }
        search.termination.max_evaluations = self.max_evals;
        search.termination.time_limit = self.time_limit_ms.map(Duration::from_millis);
        if let Some(population) = self.population {
            search.ga.population_size = population;
        }
        search.ga.seed = self.seed;
        if let Some(tolerance) = self.tolerance {
            search.size_tolerance = tolerance;
        }
        search.allow_growth = self.allow_growth;
        search.enabled = !self.no_search;

        config.allow_rotation = !self.no_rotate;
        config
    }
}

impl Config {
    /// Build a config from command-line arguments (program name excluded).
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let argv = std::iter::once("nestpack".to_string()).chain(args);
        CliArgs::try_parse_from(argv)
            .map(CliArgs::into_config)
            .map_err(|e| ConfigError::Cli(e.to_string()))
    }
}

/// Parse `WxH` (e.g. `200x150`).
fn parse_size(v: &str) -> Result<(f32, f32), String> {
    let invalid = || format!("expected WxH, got '{}'", v);
    let (w, h) = v.split_once(['x', 'X']).ok_or_else(invalid)?;
    let w = w.trim().parse().map_err(|_| invalid())?;
    let h = h.trim().parse().map_err(|_| invalid())?;
    Ok((w, h))
}

fn parse_container(v: &str) -> Result<Container, String> {
    parse_size(v).map(|(w, h)| Container::new(w, h))
}

/// Parse `WxH` or `WxH:label`.
fn parse_rect(v: &str) -> Result<RectSpec, String> {
    let (size, label) = v.split_once(':').unwrap_or((v, ""));
    parse_size(size).map(|(w, h)| RectSpec::labeled(label, w, h))
}
