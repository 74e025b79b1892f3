use thiserror::Error;

/// Error taxonomy for the slab Monte Carlo code.
///
/// Configuration errors abort at construction time and are never clamped.
/// Domain and degeneracy errors mark an invalid physical model or a
/// programming error. Particle leakage and source extinction are valid
/// terminal states reported through statistics, not through this enum.
#[derive(Error, Debug)]
pub enum SlabError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Position {x} lies outside the slab [0, {length}]")]
    OutOfDomain { x: f64, length: f64 },

    #[error("Node {node} has no {side} neighbor zone")]
    NoNeighbor { node: usize, side: &'static str },

    #[error("Sweep direction cosine {mu} is degenerate (|mu| within machine epsilon of 0)")]
    DegenerateDirection { mu: f64 },

    #[error("Non-positive total cross section {sigma_t} in zone {zone}")]
    NonPositiveCrossSection { zone: usize, sigma_t: f64 },

    #[error("Fission source has zero total weight")]
    EmptySource,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SlabResult<T> = Result<T, SlabError>;
