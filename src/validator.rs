//! Time series validation
//!
//! Differentiation assumes a uniform sample step, so the series is checked in
//! a single pass before any output buffer is touched.

use crate::error::DataError;
use crate::hyperparams::Hyperparameters;
use crate::types::{Kilogram, RawTimeSeries, Second};

/// Validate a raw series against the hyperparameters, returning the uniform
/// sample step on success.
///
/// Decreasing time and non-uniform spacing are reported separately since they
/// point at different upstream faults (bad sensor merge vs. variable frame
/// rate).
pub fn validate_series(
    series: &RawTimeSeries,
    params: &Hyperparameters,
) -> Result<Second, DataError> {
    let samples = series.time.len();
    if (samples as u64) < params.min_num_samples {
        return Err(DataError::TooFewSamples {
            required: params.min_num_samples as usize,
            actual: samples,
        });
    }
    if series.position.len() != samples {
        return Err(DataError::LengthMismatch {
            field: "position",
            expected: samples,
            actual: series.position.len(),
        });
    }
    if samples < 2 {
        return Err(DataError::TooFewSamples {
            required: 2,
            actual: samples,
        });
    }

    let step = sample_step(&series.time, params.time_delta_eps)?;
    if step == 0.0 {
        return Err(DataError::ZeroTimeStep);
    }
    Ok(step)
}

/// Walk the time stamps once and return the first delta if every delta
/// matches it within `eps`
pub fn sample_step(time: &[Second], eps: Second) -> Result<Second, DataError> {
    let Some(step) = time.get(1).zip(time.first()).map(|(t1, t0)| t1 - t0) else {
        return Err(DataError::TooFewSamples {
            required: 2,
            actual: time.len(),
        });
    };
    if let Some(index) = time.iter().position(|t| !t.is_finite()) {
        return Err(DataError::NonFiniteTime { index });
    }

    for (i, pair) in time.windows(2).enumerate() {
        let delta = pair[1] - pair[0];
        if delta < 0.0 {
            return Err(DataError::DecreasingTime { index: i + 1 });
        }
        if !((delta - step).abs() <= eps) {
            return Err(DataError::NonUniformTime {
                index: i + 1,
                delta,
                expected: step,
                eps,
            });
        }
    }
    Ok(step)
}

/// Mass must be a positive, finite number
pub fn validate_mass(mass: Kilogram) -> Result<(), DataError> {
    if mass.is_finite() && mass > 0.0 {
        Ok(())
    } else {
        Err(DataError::InvalidMass(mass))
    }
}
