//! Core types for the bar path engine
//!
//! This module defines the data structures that flow through each stage of the
//! calculation: the raw position trace, the per-sample physics profile, rep
//! splits and per-rep statistics.

use crate::hyperparams::Hyperparameters;
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// Time (s)
pub type Second = f64;
/// Mass (kg)
pub type Kilogram = f64;
/// Energy (J)
pub type Joule = f64;
/// Power (W)
pub type Watt = f64;

/// A 2-D vector. `y` is the vertical axis of the bar path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn norm_squared(self) -> f64 {
        self.dot(self)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Finite difference accuracy. The discriminant is the wire value used in
/// hyperparameter files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApproximationOrder {
    SecondOrder = 2,
    FourthOrder = 4,
}

impl ApproximationOrder {
    /// Number of samples at each end of a series that cannot be reached by
    /// the full centered stencil
    pub fn edge_gap(self) -> usize {
        match self {
            ApproximationOrder::SecondOrder => 2,
            ApproximationOrder::FourthOrder => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ApproximationOrder::SecondOrder => "second_order",
            ApproximationOrder::FourthOrder => "fourth_order",
        }
    }
}

impl TryFrom<i32> for ApproximationOrder {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(ApproximationOrder::SecondOrder),
            4 => Ok(ApproximationOrder::FourthOrder),
            other => Err(other),
        }
    }
}

impl From<ApproximationOrder> for i32 {
    fn from(order: ApproximationOrder) -> i32 {
        order as i32
    }
}

/// One set's recording: time stamps and bar positions, index aligned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTimeSeries {
    /// Sample times (s), strictly increasing with a uniform step
    pub time: Vec<Second>,
    /// Bar position (m) at each sample time
    pub position: Vec<Vec2>,
}

impl RawTimeSeries {
    pub fn new(time: Vec<Second>, position: Vec<Vec2>) -> Self {
        Self { time, position }
    }

    /// Build a series by sampling `f` at `samples` points spaced `step` apart
    pub fn sampled<F>(samples: usize, step: Second, mut f: F) -> Self
    where
        F: FnMut(Second) -> Vec2,
    {
        let time: Vec<Second> = (0..samples).map(|i| i as f64 * step).collect();
        let position = time.iter().map(|&t| f(t)).collect();
        Self { time, position }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Per-sample physics data, index aligned with the source series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicsProfile {
    pub velocity: Vec<Vec2>,
    pub acceleration: Vec<Vec2>,
    pub jerk: Vec<Vec2>,
    pub force: Vec<Vec2>,
    /// Instantaneous momentum (m·v)
    pub impulse: Vec<Vec2>,
    /// Instantaneous kinetic energy (½·m·|v|²)
    pub work: Vec<Joule>,
    pub power: Vec<Watt>,
}

impl PhysicsProfile {
    /// A zeroed profile sized for `samples` samples
    pub fn with_len(samples: usize) -> Self {
        let mut profile = Self::default();
        profile.resize(samples);
        profile
    }

    /// Resize every array to `samples`, reusing existing allocations
    pub fn resize(&mut self, samples: usize) {
        self.velocity.resize(samples, Vec2::ZERO);
        self.acceleration.resize(samples, Vec2::ZERO);
        self.jerk.resize(samples, Vec2::ZERO);
        self.force.resize(samples, Vec2::ZERO);
        self.impulse.resize(samples, Vec2::ZERO);
        self.work.resize(samples, 0.0);
        self.power.resize(samples, 0.0);
    }

    pub fn len(&self) -> usize {
        self.velocity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.velocity.is_empty()
    }
}

/// Inclusive sample index range of one repetition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepSplit {
    pub start_idx: usize,
    pub end_idx: usize,
}

impl RepSplit {
    pub fn new(start_idx: usize, end_idx: usize) -> Self {
        Self { start_idx, end_idx }
    }

    /// Number of samples covered, zero for an inverted range
    pub fn len(&self) -> usize {
        if self.end_idx < self.start_idx {
            0
        } else {
            self.end_idx - self.start_idx + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An extremal value and the time it occurred
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepStat {
    pub time: Second,
    pub value: f64,
}

/// Reduction of one repetition. Vector quantities are reduced on the vertical
/// axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepStats {
    /// Index of the split this entry was computed from
    pub rep: usize,
    pub split: RepSplit,
    pub min_vel: RepStat,
    pub max_vel: RepStat,
    pub min_acc: RepStat,
    pub max_acc: RepStat,
    pub min_force: RepStat,
    pub max_force: RepStat,
    pub min_impulse: RepStat,
    pub max_impulse: RepStat,
    pub min_work: RepStat,
    pub max_work: RepStat,
    pub avg_work: Joule,
    pub min_power: RepStat,
    pub max_power: RepStat,
    pub avg_power: Watt,
}

/// Everything a single set calculation produces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetPhysics {
    pub profile: PhysicsProfile,
    pub splits: Vec<RepSplit>,
    pub reps: Vec<RepStats>,
}

/// Report producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// A calculated set together with the inputs that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub computed_at_utc: String,
    pub parameters: Hyperparameters,
    pub mass: Kilogram,
    pub expected_reps: u32,
    pub detected_reps: usize,
    pub samples: usize,
    pub physics: SetPhysics,
}
