//! Set report encoding
//!
//! This module wraps a calculated set into a self-describing report carrying
//! the producer, the computation time and the inputs used.

use crate::error::EngineError;
use crate::hyperparams::Hyperparameters;
use crate::types::{Kilogram, ReportProducer, SetPhysics, SetReport};
use crate::{ENGINE_VERSION, PRODUCER_NAME};
use chrono::Utc;
use uuid::Uuid;

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Encoder producing set reports
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Wrap a calculated set into a report
    pub fn encode(
        &self,
        params: &Hyperparameters,
        mass: Kilogram,
        expected_reps: u32,
        physics: SetPhysics,
    ) -> SetReport {
        let producer = ReportProducer {
            name: PRODUCER_NAME.to_string(),
            version: ENGINE_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        SetReport {
            report_version: REPORT_VERSION.to_string(),
            producer,
            computed_at_utc: Utc::now().to_rfc3339(),
            parameters: params.clone(),
            mass,
            expected_reps,
            detected_reps: physics.splits.len(),
            samples: physics.profile.len(),
            physics,
        }
    }

    /// Encode a report to pretty JSON
    pub fn to_json(&self, report: &SetReport) -> Result<String, EngineError> {
        serde_json::to_string_pretty(report).map_err(EngineError::Json)
    }
}
