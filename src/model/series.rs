use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ModelError;

/// Columnar sensor time series for one run
///
/// One row per sampling instant. Timestamps are carried in two forms: wall
/// clock (`clock`) and minutes since run start (`elapsed_min`). The filtered
/// flow channel is produced by the pipeline's process stage; the smoothing
/// window trims `window / 2` samples at each end of the sequence, so
/// `flow_smoothed` holds `None` at the boundaries and always has fewer valid
/// values than the raw channel.
///
/// Invariant: all columns have identical length (checked by [`validate`]).
///
/// [`validate`]: TimeSeries::validate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Name of the source file this series was read from
    pub source_file: String,

    /// Wall-clock timestamp per sample (UTC)
    pub clock: Vec<DateTime<Utc>>,

    /// Minutes since run start per sample
    pub elapsed_min: Vec<f64>,

    /// Ice-container temperature in °C (raw)
    pub ice_temp_c: Vec<f64>,

    /// Pump flow rate in ml/min (raw)
    pub flow_ml_min: Vec<f64>,

    /// Mean perfusion pressure in mmHg (raw)
    pub pressure_mmhg: Vec<f64>,

    /// Smoothed flow rate in ml/min; `None` where the filter window ran off
    /// the ends of the sequence
    pub flow_smoothed: Vec<Option<f64>>,
}

impl TimeSeries {
    /// Number of sampling instants in the series
    pub fn len(&self) -> usize {
        self.clock.len()
    }

    /// True when the series holds no samples
    pub fn is_empty(&self) -> bool {
        self.clock.is_empty()
    }

    /// Number of non-missing values in the smoothed flow channel
    pub fn smoothed_valid_count(&self) -> usize {
        self.flow_smoothed.iter().filter(|v| v.is_some()).count()
    }

    /// Validate the equal-length invariant across all columns
    pub fn validate(&self) -> Result<(), ModelError> {
        let expected = self.clock.len();
        for (column, actual) in [
            ("elapsed_min", self.elapsed_min.len()),
            ("ice_temp_c", self.ice_temp_c.len()),
            ("flow_ml_min", self.flow_ml_min.len()),
            ("pressure_mmhg", self.pressure_mmhg.len()),
            ("flow_smoothed", self.flow_smoothed.len()),
        ] {
            if actual != expected {
                return Err(ModelError::ColumnLengthMismatch {
                    column,
                    actual,
                    expected,
                });
            }
        }
        Ok(())
    }

    /// Truncate a copy of the series to its first `n` samples
    ///
    /// Used by the report layer to plot a fixed window of one run. Returns
    /// the series unchanged when it is shorter than `n`.
    pub fn head(&self, n: usize) -> TimeSeries {
        let n = n.min(self.len());
        TimeSeries {
            source_file: self.source_file.clone(),
            clock: self.clock[..n].to_vec(),
            elapsed_min: self.elapsed_min[..n].to_vec(),
            ice_temp_c: self.ice_temp_c[..n].to_vec(),
            flow_ml_min: self.flow_ml_min[..n].to_vec(),
            pressure_mmhg: self.pressure_mmhg[..n].to_vec(),
            flow_smoothed: self.flow_smoothed[..n].to_vec(),
        }
    }
}
