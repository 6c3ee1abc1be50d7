//! Error types for the bar path engine

use thiserror::Error;

/// Hyperparameter validation failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid minimum number of samples: must be >= 2, got {0}")]
    InvalidMinSamples(u64),

    #[error("Invalid time delta epsilon: must be > 0, got {0}")]
    InvalidTimeDeltaEpsilon(f64),

    #[error("Invalid approximation order: must be 2 or 4, got {0}")]
    InvalidApproximationOrder(i32),

    #[error("Invalid near zero filter: must be >= 0, got {0}")]
    InvalidNearZeroFilter(f64),

    #[error("Invalid noise filter: must be > 0, got {0}")]
    InvalidNoiseFilter(u64),

    #[error("Invalid smoothing weight at offset {offset}: {weight}")]
    InvalidSmoothingWeights { offset: i32, weight: f64 },
}

/// Input shape and temporal integrity failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("Too few samples: need at least {required}, got {actual}")]
    TooFewSamples { required: usize, actual: usize },

    #[error("Length mismatch: expected {field} of len {expected}, got {actual}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Time sample at index {index} is not a finite number")]
    NonFiniteTime { index: usize },

    #[error("Time samples must be increasing (decrease at index {index})")]
    DecreasingTime { index: usize },

    #[error(
        "Adjacent time samples must share the same delta: index {index} has delta {delta}, expected {expected} (within {eps})"
    )]
    NonUniformTime {
        index: usize,
        delta: f64,
        expected: f64,
        eps: f64,
    },

    #[error("Time step between the first two samples is zero")]
    ZeroTimeStep,

    #[error("Invalid mass: must be > 0, got {0}")]
    InvalidMass(f64),
}

/// Errors surfaced by the public calculation entry points
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid hyperparameters: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid time series: {0}")]
    Data(#[from] DataError),

    #[error("Invalid rep count: must be > 0, got {0}")]
    InvalidRepCount(i32),

    #[error("Invalid set count: must be a positive number, got {0}")]
    InvalidSetCount(f64),

    #[error("Expected {expected} recorded sets for {sets} sets, got {actual}")]
    SetCountMismatch {
        sets: f64,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
