use serde::{Deserialize, Serialize};
use std::fmt;

use super::ModelError;

/// Scalar indicators for one run, aggregated from its time series
///
/// One record per input file, produced by the pipeline's summarize stage.
/// Mean indicators are `None` when the underlying channel held no finite
/// samples.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Name of the source file this summary was computed from
    pub source_file: String,

    /// Serial number of the device that produced the run
    pub serial: String,

    /// Perfusion duration in minutes
    pub perfusion_min: f64,

    /// Mean ice-container temperature in °C
    pub mean_ice_temp_c: Option<f64>,

    /// Mean pump flow rate in ml/min
    pub mean_flow_ml_min: Option<f64>,

    /// Mean perfusion pressure in mmHg
    pub mean_pressure_mmhg: Option<f64>,

    /// Mean organ resistance in mmHg·min/ml (pressure over flow)
    pub mean_resistance: Option<f64>,

    /// Minutes the ice-container temperature spent below the threshold
    pub minutes_below_ice_threshold: f64,

    /// Threshold used to classify ice-related conditions, in °C
    pub ice_threshold_c: f64,
}

impl RunSummary {
    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run Summary: {}", self.source_file)?;
        writeln!(f, "  Device serial: {}", self.serial)?;
        writeln!(f, "  Perfusion time: {:.1} min", self.perfusion_min)?;
        if let Some(t) = self.mean_ice_temp_c {
            writeln!(f, "  Mean ice temperature: {:.2} °C", t)?;
        }
        if let Some(q) = self.mean_flow_ml_min {
            writeln!(f, "  Mean flow: {:.1} ml/min", q)?;
        }
        if let Some(p) = self.mean_pressure_mmhg {
            writeln!(f, "  Mean pressure: {:.1} mmHg", p)?;
        }
        if let Some(r) = self.mean_resistance {
            writeln!(f, "  Mean resistance: {:.3} mmHg·min/ml", r)?;
        }
        write!(
            f,
            "  Below {:.1} °C: {:.1} min",
            self.ice_threshold_c, self.minutes_below_ice_threshold
        )
    }
}
