//! Calculation hyperparameters
//!
//! Tuning values for the bar path calculation. Parameter sets are versioned
//! and can be stored as JSON; any field missing from a stored set falls back
//! to the default value.

use crate::error::ConfigError;
use crate::types::{ApproximationOrder, Second};
use serde::{Deserialize, Serialize};

/// Default smoothing kernel, offsets -2..=2
pub const DEFAULT_SMOOTHING_WEIGHTS: [f64; 5] = [0.5, 0.5, 1.0, 0.5, 0.5];

/// Hyperparameters used by the algorithm that calculates physics data from
/// the bar's position over time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    /// Parameter set version, carried through to reports
    pub version: i32,
    /// Minimum series length accepted
    pub min_num_samples: u64,
    /// Maximum allowed deviation between consecutive time deltas (s)
    pub time_delta_eps: Second,
    /// Finite difference accuracy, 2 or 4
    pub approximation_order: i32,
    /// Minimum length (samples) of a same-sign velocity run; shorter runs
    /// are dropped as chatter
    pub noise_filter: u64,
    /// Dead-zone half width applied to the smoothed velocity (m/s)
    pub near_zero_filter: f64,
    /// Symmetric smoothing kernel applied to velocity before segmentation
    pub smoothing_weights: [f64; 5],
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            version: 1,
            min_num_samples: 10,
            time_delta_eps: 1e-2,
            approximation_order: ApproximationOrder::FourthOrder.into(),
            noise_filter: 3,
            near_zero_filter: 0.1,
            smoothing_weights: DEFAULT_SMOOTHING_WEIGHTS,
        }
    }
}

impl Hyperparameters {
    /// Default parameters with a specific approximation order
    pub fn with_order(order: ApproximationOrder) -> Self {
        Self {
            approximation_order: order.into(),
            ..Self::default()
        }
    }

    /// Check every field. The first failing rule is reported.
    ///
    /// The following must be true:
    ///   - `min_num_samples >= 2`
    ///   - `time_delta_eps > 0`
    ///   - `approximation_order` is 2 or 4
    ///   - `near_zero_filter >= 0`
    ///   - `noise_filter > 0`
    ///   - every smoothing weight is finite and non-negative
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_num_samples < 2 {
            return Err(ConfigError::InvalidMinSamples(self.min_num_samples));
        }
        if !(self.time_delta_eps.is_finite() && self.time_delta_eps > 0.0) {
            return Err(ConfigError::InvalidTimeDeltaEpsilon(self.time_delta_eps));
        }
        self.order()?;
        if !(self.near_zero_filter.is_finite() && self.near_zero_filter >= 0.0) {
            return Err(ConfigError::InvalidNearZeroFilter(self.near_zero_filter));
        }
        if self.noise_filter == 0 {
            return Err(ConfigError::InvalidNoiseFilter(self.noise_filter));
        }
        for (i, &weight) in self.smoothing_weights.iter().enumerate() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidSmoothingWeights {
                    offset: i as i32 - 2,
                    weight,
                });
            }
        }
        Ok(())
    }

    /// Typed approximation order
    pub fn order(&self) -> Result<ApproximationOrder, ConfigError> {
        ApproximationOrder::try_from(self.approximation_order)
            .map_err(ConfigError::InvalidApproximationOrder)
    }

    /// Load a parameter set from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the parameter set to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
