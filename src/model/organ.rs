use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ModelError;

/// Laterality of the perfused kidney
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganSide {
    /// Left kidney
    Left,
    /// Right kidney
    Right,
}

impl std::fmt::Display for OrganSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrganSide::Left => write!(f, "left"),
            OrganSide::Right => write!(f, "right"),
        }
    }
}

/// Manually entered clinical metadata for the perfused organ
///
/// Entry at the device is manual and optional. Absent fields are represented
/// as `None` and passed through silently; they are a property of the data,
/// not an error condition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganRecord {
    /// Which kidney was perfused
    pub side: Option<OrganSide>,

    /// Donor blood type as entered (e.g., "O", "A+")
    pub blood_type: Option<String>,

    /// Cross-clamp timestamp: interruption of organ blood supply (UTC)
    pub cross_clamp_time: Option<DateTime<Utc>>,
}

impl OrganRecord {
    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }
}
