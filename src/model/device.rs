use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ModelError;

/// Identity and timing of one perfusion device run
///
/// One record per input file. Serial numbers are read back from the device
/// export verbatim; they are operator-visible identifiers and occasionally
/// contain characters that are hostile to rendering, so display layers must
/// escape them rather than trust them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Device serial number as recorded in the export
    pub serial: String,

    /// Device model/type string (e.g., "LifePort Kidney Transporter 1.1")
    pub model: Option<String>,

    /// Firmware revision, when the export carries one
    pub firmware: Option<String>,

    /// Run start timestamp (UTC)
    pub start_time: DateTime<Utc>,

    /// Run stop timestamp (UTC)
    pub stop_time: DateTime<Utc>,

    /// Run duration in minutes
    pub duration_min: f64,

    /// Name of the source file this record was read from
    pub source_file: String,
}

impl DeviceRecord {
    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }
}
