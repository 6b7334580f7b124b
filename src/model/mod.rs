//! # Record Model for renaflow
//!
//! The pipeline produces four record kinds per processed run. Three of them
//! are single-row (one record per input file); the time series is a columnar
//! table with one row per sampling instant.
//!
//! ## Record Kinds
//!
//! 1. **Device record**: identifies one perfusion device and run — serial
//!    number, device model, start/stop timestamps, run duration, and the
//!    source file the record came from.
//!
//! 2. **Organ record**: manually entered clinical metadata for the perfused
//!    organ. Every field is optional; entry at the device is manual and
//!    frequently skipped, and absent values are not errors.
//!
//! 3. **Time series**: raw sensor channels (ice-container temperature, flow
//!    rate, perfusion pressure) plus the filtered flow channel, with
//!    timestamps in wall-clock and time-since-start form.
//!
//! 4. **Run summary**: scalar indicators aggregated from the time series by
//!    the pipeline's summarize stage.
//!
//! The consolidated tables in [`crate::batch`] are joined by position: row i
//! of every collection refers to the same source file.

mod device;
mod error;
mod organ;
mod series;
mod summary;

#[cfg(test)]
mod tests;

pub use device::DeviceRecord;
pub use error::ModelError;
pub use organ::{OrganRecord, OrganSide};
pub use series::TimeSeries;
pub use summary::RunSummary;
