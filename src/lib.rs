//! Barpath Physics - Kinematics, dynamics and rep segmentation for bar path traces
//!
//! The engine turns a uniformly sampled 2-D barbell position trace into a
//! per-sample physics profile and per-rep statistics through a deterministic
//! pipeline: validation → differentiation → dynamics → rep segmentation →
//! aggregation.
//!
//! ## Modules
//!
//! - **Calculation**: [`calculate`] / [`calculate_into`] for one set,
//!   [`calculate_sets`] for a prescription with a fractional set count
//! - **Reports**: [`SetProcessor`] wraps results with producer metadata
//!
//! Every stage is a pure function of its inputs and safe to call from many
//! threads at once.

pub mod aggregator;
pub mod dynamics;
pub mod encoder;
pub mod error;
pub mod hyperparams;
pub mod kinematics;
pub mod pipeline;
pub mod segmenter;
pub mod types;
pub mod validator;

pub use error::{ConfigError, DataError, EngineError};
pub use hyperparams::Hyperparameters;
pub use pipeline::{calculate, calculate_into, calculate_sets, expected_reps_per_set, SetProcessor};
pub use types::{
    ApproximationOrder, PhysicsProfile, RawTimeSeries, RepSplit, RepStat, RepStats, SetPhysics,
    SetReport, Vec2,
};

/// Engine version embedded in all set reports
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for set reports
pub const PRODUCER_NAME: &str = "barpath-physics";
