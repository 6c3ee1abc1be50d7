//! Pipeline orchestration
//!
//! This module provides the public API of the engine. It runs a recorded set
//! through validation, differentiation, dynamics, segmentation and
//! aggregation, and plans the per-set rep counts of fractional set
//! prescriptions.

use crate::aggregator::aggregate;
use crate::dynamics::{self, DynamicsOut};
use crate::encoder::ReportEncoder;
use crate::error::{DataError, EngineError};
use crate::hyperparams::Hyperparameters;
use crate::kinematics;
use crate::segmenter::segment;
use crate::types::{ApproximationOrder, Kilogram, RawTimeSeries, Second, SetPhysics, SetReport};
use crate::validator::{validate_mass, validate_series};
use tracing::{debug, warn};

/// Calculate the physics profile, rep splits and rep stats of one set.
///
/// # Arguments
/// * `series` - Recorded bar positions, uniformly sampled
/// * `params` - Calculation hyperparameters
/// * `mass` - Load on the bar (kg)
/// * `expected_reps` - Prescribed rep count, used as an upper bound (0 for none)
///
/// # Example
/// ```ignore
/// let physics = calculate(&series, &Hyperparameters::default(), 100.0, 5)?;
/// println!("{} reps", physics.splits.len());
/// ```
pub fn calculate(
    series: &RawTimeSeries,
    params: &Hyperparameters,
    mass: Kilogram,
    expected_reps: u32,
) -> Result<SetPhysics, EngineError> {
    let mut out = SetPhysics::default();
    calculate_into(series, params, mass, expected_reps, &mut out)?;
    Ok(out)
}

/// Same as [`calculate`], writing into caller owned buffers.
///
/// Every buffer in `out` is resized to the sample count. All validation runs
/// before the first write, so `out` is left untouched on error.
///
/// Pipeline stages:
/// 1. Validation - hyperparameters, mass and time series
/// 2. Kinematics - velocity, acceleration and jerk from position
/// 3. Dynamics - force, impulse, work and power
/// 4. Segmenter - rep splits from the vertical velocity
/// 5. Aggregator - per rep extrema and averages
pub fn calculate_into(
    series: &RawTimeSeries,
    params: &Hyperparameters,
    mass: Kilogram,
    expected_reps: u32,
    out: &mut SetPhysics,
) -> Result<(), EngineError> {
    // Stage 1: Validate everything before touching the output
    let (order, step) = prepare(series, params, mass).map_err(|err| {
        warn!(error = %err, samples = series.len(), "Rejected set");
        err
    })?;

    debug!(
        samples = series.len(),
        order = order.as_str(),
        step,
        mass,
        expected_reps,
        "Calculating set physics"
    );

    let profile = &mut out.profile;
    profile.resize(series.len());

    // Stage 2: Differentiate position
    kinematics::differentiate(
        &series.position,
        step,
        order,
        &mut profile.velocity,
        &mut profile.acceleration,
        &mut profile.jerk,
    )?;

    // Stage 3: Derive dynamics
    dynamics::derive(
        mass,
        &profile.velocity,
        &profile.acceleration,
        DynamicsOut {
            force: &mut profile.force,
            impulse: &mut profile.impulse,
            work: &mut profile.work,
            power: &mut profile.power,
        },
    )?;

    // Stage 4: Split into reps
    out.splits = segment(&out.profile.velocity, params, expected_reps);

    // Stage 5: Reduce each rep
    out.reps = aggregate(&series.time, &out.profile, &out.splits);

    Ok(())
}

fn prepare(
    series: &RawTimeSeries,
    params: &Hyperparameters,
    mass: Kilogram,
) -> Result<(ApproximationOrder, Second), EngineError> {
    params.validate()?;
    let order = params.order()?;
    validate_mass(mass)?;
    let step = validate_series(series, params)?;

    let required = kinematics::min_samples(order);
    if series.len() < required {
        return Err(DataError::TooFewSamples {
            required,
            actual: series.len(),
        }
        .into());
    }
    Ok((order, step))
}

/// Expected rep count of every recorded set of a prescription.
///
/// A fractional set count adds one partial set whose rep count is the same
/// fraction of `reps`, truncated, but never less than one.
///
/// ```ignore
/// assert_eq!(expected_reps_per_set(2.5, 4)?, vec![4, 4, 2]);
/// ```
pub fn expected_reps_per_set(sets: f64, reps: i32) -> Result<Vec<u32>, EngineError> {
    let count = planned_set_count(sets, reps)?;
    let mut plan = Vec::new();
    plan.try_reserve_exact(count)
        .map_err(|_| EngineError::InvalidSetCount(sets))?;
    plan.resize(count, reps as u32);

    let full_sets = sets.floor();
    if sets > full_sets {
        let partial = ((sets - full_sets) * f64::from(reps)) as u32;
        plan[full_sets as usize] = partial.max(1);
    }
    Ok(plan)
}

/// Number of recordings a prescription of `sets` sets calls for
fn planned_set_count(sets: f64, reps: i32) -> Result<usize, EngineError> {
    if reps <= 0 {
        return Err(EngineError::InvalidRepCount(reps));
    }
    if !sets.is_finite() || sets <= 0.0 {
        return Err(EngineError::InvalidSetCount(sets));
    }
    // Saturates at usize::MAX
    Ok(sets.ceil() as usize)
}

/// Calculate every recorded set of a prescription of `sets` sets of `reps`.
///
/// `series` holds one recording per planned set (`ceil(sets)` of them). With
/// the `parallel` feature the sets are calculated on the rayon thread pool.
pub fn calculate_sets(
    series: &[RawTimeSeries],
    params: &Hyperparameters,
    mass: Kilogram,
    sets: f64,
    reps: i32,
) -> Result<Vec<SetPhysics>, EngineError> {
    let expected = planned_set_count(sets, reps)?;
    if series.len() != expected {
        return Err(EngineError::SetCountMismatch {
            sets,
            expected,
            actual: series.len(),
        });
    }
    let plan = expected_reps_per_set(sets, reps)?;

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        series
            .par_iter()
            .zip(plan.par_iter())
            .map(|(set, &expected)| calculate(set, params, mass, expected))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        series
            .iter()
            .zip(&plan)
            .map(|(set, &expected)| calculate(set, params, mass, expected))
            .collect()
    }
}

/// Processor bound to one parameter set, producing encoded set reports.
///
/// Holds no state between calls apart from its configuration.
pub struct SetProcessor {
    params: Hyperparameters,
    encoder: ReportEncoder,
}

impl Default for SetProcessor {
    fn default() -> Self {
        Self {
            params: Hyperparameters::default(),
            encoder: ReportEncoder::new(),
        }
    }
}

impl SetProcessor {
    /// Create a processor, rejecting invalid parameters up front
    pub fn new(params: Hyperparameters) -> Result<Self, EngineError> {
        params.validate()?;
        Ok(Self {
            params,
            encoder: ReportEncoder::new(),
        })
    }

    /// Create a processor from a JSON parameter set
    pub fn from_params_json(json: &str) -> Result<Self, EngineError> {
        Self::new(Hyperparameters::from_json(json)?)
    }

    pub fn params(&self) -> &Hyperparameters {
        &self.params
    }

    /// Calculate one set and wrap it in a report
    pub fn process(
        &self,
        series: &RawTimeSeries,
        mass: Kilogram,
        expected_reps: u32,
    ) -> Result<SetReport, EngineError> {
        let physics = calculate(series, &self.params, mass, expected_reps)?;
        Ok(self
            .encoder
            .encode(&self.params, mass, expected_reps, physics))
    }

    /// Calculate one set and encode the report as pretty JSON
    pub fn process_to_json(
        &self,
        series: &RawTimeSeries,
        mass: Kilogram,
        expected_reps: u32,
    ) -> Result<String, EngineError> {
        let report = self.process(series, mass, expected_reps)?;
        self.encoder.to_json(&report)
    }
}
