//! Error types for configuration, search and packing.

use thiserror::Error;

/// Rejected configuration. Raised before any search runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("container must have positive size, got {width}x{height}")]
    NonPositiveContainer { width: f32, height: f32 },

    #[error("margin must be finite and non-negative, got {0}")]
    InvalidMargin(f32),

    #[error("no rectangles to pack")]
    NoRectangles,

    #[error("rectangle {index} has invalid size {width}x{height} (each side must be at least 1)")]
    InvalidRect { index: usize, width: f32, height: f32 },

    #[error("rectangle {index} side {value} exceeds the 16-bit gene field ({max})")]
    DimensionOverflow { index: usize, value: f32, max: u16 },

    #[error("rectangle {index} ({width}x{height} plus margin {margin}) fits the container in neither orientation")]
    OversizedRect {
        index: usize,
        width: f32,
        height: f32,
        margin: f32,
    },

    #[error("{name} must be at least {min}, got {value}")]
    TooSmall {
        name: &'static str,
        value: usize,
        min: usize,
    },

    #[error("{name} must lie in [0, 1], got {value}")]
    InvalidRate { name: &'static str, value: f64 },

    #[error("size tolerance must lie in [0, 1), got {0}")]
    InvalidTolerance(f64),

    /// Rendered command-line parse error
    #[error("{0}")]
    Cli(String),
}

/// Precondition failures of a search run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("search population is empty")]
    EmptyPopulation,

    #[error("candidate vectors must contain at least one gene")]
    EmptyCandidate,

    #[error("candidate {index} has {found} genes, expected {expected}")]
    RaggedPopulation {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("best candidate has {found} genes but {expected} rectangles were requested")]
    LengthMismatch { expected: usize, found: usize },
}

/// Failure of a packing pass. The pass is atomic: no placements survive.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PackError {
    #[error("no free region fits rectangle {index} ({width}x{height}, margin {margin}); adjust container size or margin")]
    Infeasible {
        index: usize,
        width: f32,
        height: f32,
        margin: f32,
    },
}

/// Any failure of a full run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Pack(#[from] PackError),
}

pub type Result<T> = std::result::Result<T, Error>;
