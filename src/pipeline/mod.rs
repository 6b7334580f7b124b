//! # Pipeline Boundary
//!
//! All of the hard analysis work — parsing the vendor export format,
//! filtering sensor channels, aggregating per-run indicators — belongs to an
//! external analysis package. This module defines the three-operation
//! contract renaflow drives, and nothing else:
//!
//! 1. [`Pipeline::read`] — parse one raw export file into a [`RawRun`].
//!    Fails on empty, truncated, or malformed input.
//! 2. [`Pipeline::process`] — add the filtered flow channel, parameterized by
//!    a smoothing window size in samples. The window trims `window / 2`
//!    samples at each end of the sequence.
//! 3. [`Pipeline::summarize`] — aggregate the run into the four-part
//!    [`RunBundle`], parameterized by the temperature threshold used to
//!    classify ice-related conditions.
//!
//! [`SyntheticPipeline`] is the only implementation shipped with the crate:
//! it reads the deterministic demo export format written by `renaflow demo`
//! and exists so the batch loop, the report, and the test suite can run end
//! to end without the external package.

mod synthetic;

pub use synthetic::{DemoRun, SyntheticPipeline, DEMO_MAGIC};

use chrono::{DateTime, Duration, Utc};
use std::path::Path;

use crate::model::{DeviceRecord, OrganRecord, OrganSide, RunSummary, TimeSeries};

/// Errors raised by pipeline stages
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// I/O error while reading an export file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Input file contains no data at all
    #[error("file is empty")]
    EmptyFile,

    /// Input file does not carry the expected format marker
    #[error("unrecognized format: {0}")]
    UnrecognizedFormat(String),

    /// A required header field is absent
    #[error("missing required header field: {0}")]
    MissingField(String),

    /// A header or sample line could not be parsed
    #[error("malformed input at line {line}: {message}")]
    Malformed {
        /// 1-based line number of the offending input
        line: usize,
        /// What went wrong
        message: String,
    },

    /// A stage parameter is out of its accepted range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A stage output violated the inter-stage contract
    #[error("pipeline contract violation: {0}")]
    ContractViolation(String),
}

/// Header fields shared by every export, parsed by the read stage
///
/// Device identity and timing are required; the clinical fields mirror the
/// organ record and are optional because entry at the device is manual.
#[derive(Debug, Clone)]
pub struct RunHeader {
    /// Device serial number
    pub serial: String,
    /// Device model string
    pub model: Option<String>,
    /// Firmware revision
    pub firmware: Option<String>,
    /// Run start timestamp (UTC)
    pub start_time: DateTime<Utc>,
    /// Sampling interval in seconds
    pub sample_interval_s: f64,
    /// Which kidney was perfused
    pub side: Option<OrganSide>,
    /// Donor blood type
    pub blood_type: Option<String>,
    /// Cross-clamp timestamp (UTC)
    pub cross_clamp_time: Option<DateTime<Utc>>,
}

/// Output of the read stage: parsed header plus raw sensor channels
#[derive(Debug, Clone)]
pub struct RawRun {
    /// Parsed export header
    pub header: RunHeader,
    /// Name of the source file
    pub source_file: String,
    /// Seconds since run start, one entry per sample
    pub elapsed_s: Vec<f64>,
    /// Ice-container temperature in °C
    pub ice_temp_c: Vec<f64>,
    /// Pump flow rate in ml/min
    pub flow_ml_min: Vec<f64>,
    /// Mean perfusion pressure in mmHg
    pub pressure_mmhg: Vec<f64>,
}

impl RawRun {
    /// Number of samples in the run
    pub fn len(&self) -> usize {
        self.elapsed_s.len()
    }

    /// True when the run holds no samples
    pub fn is_empty(&self) -> bool {
        self.elapsed_s.is_empty()
    }

    /// Validate the inter-stage contract for a parsed run
    ///
    /// All channels must share one length and at least one sample must be
    /// present; a file that parses to zero samples is indistinguishable from
    /// a truncated export.
    pub fn validate_contract(&self) -> Result<(), PipelineError> {
        if self.is_empty() {
            return Err(PipelineError::ContractViolation(
                "run holds no samples".to_string(),
            ));
        }

        let expected = self.elapsed_s.len();
        for (name, actual) in [
            ("ice_temp_c", self.ice_temp_c.len()),
            ("flow_ml_min", self.flow_ml_min.len()),
            ("pressure_mmhg", self.pressure_mmhg.len()),
        ] {
            if actual != expected {
                return Err(PipelineError::ContractViolation(format!(
                    "{name} length {actual} does not match expected {expected}"
                )));
            }
        }

        if !self.header.sample_interval_s.is_finite() || self.header.sample_interval_s <= 0.0 {
            return Err(PipelineError::ContractViolation(format!(
                "sample interval must be positive, got {}",
                self.header.sample_interval_s
            )));
        }

        Ok(())
    }
}

/// Output of the process stage: the raw run plus the filtered flow channel
#[derive(Debug, Clone)]
pub struct ProcessedRun {
    /// The run as parsed by the read stage
    pub raw: RawRun,
    /// Smoothed flow channel; `None` where the window ran off the ends
    pub flow_smoothed: Vec<Option<f64>>,
    /// Window size, in samples, the filter was run with
    pub window: usize,
}

impl ProcessedRun {
    /// Validate the inter-stage contract for a processed run
    pub fn validate_contract(&self) -> Result<(), PipelineError> {
        self.raw.validate_contract()?;
        if self.flow_smoothed.len() != self.raw.len() {
            return Err(PipelineError::ContractViolation(format!(
                "flow_smoothed length {} does not match raw length {}",
                self.flow_smoothed.len(),
                self.raw.len()
            )));
        }
        Ok(())
    }
}

/// Four-part output of the summarize stage
///
/// One bundle per successfully processed file. The batch layer appends all
/// four parts atomically so the consolidated tables stay order-joined.
#[derive(Debug, Clone)]
pub struct RunBundle {
    /// Device identity and timing
    pub device: DeviceRecord,
    /// Clinical organ metadata
    pub organ: OrganRecord,
    /// Full sensor time series
    pub series: TimeSeries,
    /// Scalar indicators for the run
    pub summary: RunSummary,
}

/// The three-stage analysis boundary renaflow sequences
///
/// Implementations own the export format and the filtering/aggregation
/// algorithms; renaflow owns the loop, the tables, and the report.
pub trait Pipeline {
    /// Parse one raw export file
    fn read(&self, path: &Path) -> Result<RawRun, PipelineError>;

    /// Add the filtered flow channel, using a smoothing window of `window`
    /// samples
    fn process(&self, run: RawRun, window: usize) -> Result<ProcessedRun, PipelineError>;

    /// Aggregate a processed run into its four-record bundle, classifying
    /// ice-related conditions against `ice_threshold_c`
    fn summarize(
        &self,
        run: ProcessedRun,
        ice_threshold_c: f64,
    ) -> Result<RunBundle, PipelineError>;
}

/// Assemble the device/organ/series records shared by every summarize
/// implementation
///
/// The scalar indicators differ per analysis package, but the mapping from a
/// processed run to its device, organ, and time-series records is fixed by
/// the export header, so it lives here next to the contract types.
pub fn assemble_records(run: &ProcessedRun) -> (DeviceRecord, OrganRecord, TimeSeries) {
    let header = &run.raw.header;
    let n = run.raw.len();

    let last_elapsed_s = run.raw.elapsed_s.last().copied().unwrap_or(0.0);
    let stop_time = header.start_time + Duration::milliseconds((last_elapsed_s * 1000.0) as i64);

    let device = DeviceRecord {
        serial: header.serial.clone(),
        model: header.model.clone(),
        firmware: header.firmware.clone(),
        start_time: header.start_time,
        stop_time,
        duration_min: last_elapsed_s / 60.0,
        source_file: run.raw.source_file.clone(),
    };

    let organ = OrganRecord {
        side: header.side,
        blood_type: header.blood_type.clone(),
        cross_clamp_time: header.cross_clamp_time,
    };

    let mut series = TimeSeries {
        source_file: run.raw.source_file.clone(),
        clock: Vec::with_capacity(n),
        elapsed_min: Vec::with_capacity(n),
        ice_temp_c: run.raw.ice_temp_c.clone(),
        flow_ml_min: run.raw.flow_ml_min.clone(),
        pressure_mmhg: run.raw.pressure_mmhg.clone(),
        flow_smoothed: run.flow_smoothed.clone(),
    };
    for &elapsed_s in &run.raw.elapsed_s {
        series
            .clock
            .push(header.start_time + Duration::milliseconds((elapsed_s * 1000.0) as i64));
        series.elapsed_min.push(elapsed_s / 60.0);
    }

    (device, organ, series)
}
