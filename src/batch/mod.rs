//! # Batch Ingestion and Consolidation
//!
//! The batch layer owns the loop the report is built on: discover input
//! files, drive the three pipeline stages over each file in order, and
//! append the resulting bundles to the consolidated table set.
//!
//! Execution is strictly sequential — one file is read, processed, and
//! summarized at a time, and the only state that crosses iterations is the
//! append-only [`Batch`] accumulator.
//!
//! ## Failure policy
//!
//! The default policy is fail-fast: the first failing file aborts the whole
//! batch with [`BatchError::FileFailed`], carrying the failing index and
//! path, and the accumulator keeps only the files processed before it.
//! [`ErrorPolicy::KeepGoing`] opts in to per-file isolation instead,
//! recording each failure and continuing. The [`scan`] tool covers the
//! find-the-corrupt-file workflow in either mode.
//!
//! [`scan`]: crate::batch::scan_inputs

mod discover;
mod error;
mod scan;

pub use discover::discover_inputs;
pub use error::BatchError;
pub use scan::{scan_inputs, ScanEntry, ScanReport, ScanStatus};

use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::model::{DeviceRecord, OrganRecord, RunSummary, TimeSeries};
use crate::pipeline::{Pipeline, PipelineError, RunBundle};

/// What to do when a file fails one of the pipeline stages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Abort the batch at the first failing file (default)
    #[default]
    FailFast,
    /// Record the failure and continue with the next file
    KeepGoing,
}

/// Parameters for one batch run
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Smoothing window for the process stage, in samples
    pub window: usize,
    /// Temperature threshold for the summarize stage, in °C
    pub ice_threshold_c: f64,
    /// Process only the first N discovered files
    pub max_files: Option<usize>,
    /// Failure policy for the loop
    pub on_error: ErrorPolicy,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            window: 9,
            ice_threshold_c: 4.0,
            max_files: None,
            on_error: ErrorPolicy::FailFast,
        }
    }
}

/// The consolidated table set: four collections joined by position
///
/// Each successfully processed file contributes exactly one entry to every
/// collection, in input order. Row i of any table refers to the same source
/// file as row i of the others; the report relies on that positional join
/// for indexed lookups such as "the fourth time series".
#[derive(Debug, Clone, Default)]
pub struct Batch {
    /// Device records, one per file
    pub devices: Vec<DeviceRecord>,
    /// Organ records, one per file
    pub organs: Vec<OrganRecord>,
    /// Time-series tables, one per file
    pub series: Vec<TimeSeries>,
    /// Run summaries, one per file
    pub summaries: Vec<RunSummary>,
}

impl Batch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of consolidated runs
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// True when no runs have been consolidated
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Append one run's bundle, keeping all four collections in step
    pub fn push(&mut self, bundle: RunBundle) {
        self.devices.push(bundle.device);
        self.organs.push(bundle.organ);
        self.series.push(bundle.series);
        self.summaries.push(bundle.summary);
    }

    /// Time series for the run at `index`, if consolidated
    pub fn series(&self, index: usize) -> Option<&TimeSeries> {
        self.series.get(index)
    }

    /// Verify the one-row-per-file alignment invariant
    pub fn validate_alignment(&self) -> Result<(), BatchError> {
        let expected = self.devices.len();
        for (table, actual) in [
            ("organs", self.organs.len()),
            ("series", self.series.len()),
            ("summaries", self.summaries.len()),
        ] {
            if actual != expected {
                return Err(BatchError::Misaligned {
                    table,
                    actual,
                    expected,
                });
            }
        }
        Ok(())
    }
}

/// One recorded per-file failure under [`ErrorPolicy::KeepGoing`]
#[derive(Debug)]
pub struct FileFailure {
    /// Zero-based position of the file in the input list
    pub index: usize,
    /// Path of the failing file
    pub path: PathBuf,
    /// The stage error
    pub error: PipelineError,
}

/// Result of a completed batch run
#[derive(Debug)]
pub struct BatchOutcome {
    /// Consolidated tables for the successfully processed files
    pub batch: Batch,
    /// Per-file failures (empty under fail-fast, which aborts instead)
    pub failures: Vec<FileFailure>,
}

/// Sequentially drives a pipeline over a list of input files
#[derive(Debug)]
pub struct BatchRunner<'a, P: Pipeline> {
    pipeline: &'a P,
    config: BatchConfig,
}

impl<'a, P: Pipeline> BatchRunner<'a, P> {
    /// Create a runner over `pipeline` with the given configuration
    pub fn new(pipeline: &'a P, config: BatchConfig) -> Self {
        Self { pipeline, config }
    }

    /// Run the batch loop, appending results into an existing accumulator
    ///
    /// Under fail-fast the error from the first failing file is returned and
    /// `batch` keeps exactly the bundles consolidated before it. Under
    /// keep-going, failures are returned alongside `Ok`.
    pub fn run_into(
        &self,
        files: &[PathBuf],
        batch: &mut Batch,
    ) -> Result<Vec<FileFailure>, BatchError> {
        let files = match self.config.max_files {
            Some(max) => &files[..files.len().min(max)],
            None => files,
        };

        let mut failures = Vec::new();
        for (index, path) in files.iter().enumerate() {
            info!(
                "processing file {}/{}: {}",
                index + 1,
                files.len(),
                path.display()
            );

            match self.process_one(path) {
                Ok(bundle) => batch.push(bundle),
                Err(error) => match self.config.on_error {
                    ErrorPolicy::FailFast => {
                        return Err(BatchError::FileFailed {
                            index,
                            path: path.clone(),
                            source: error,
                        })
                    }
                    ErrorPolicy::KeepGoing => {
                        warn!("skipping {}: {}", path.display(), error);
                        failures.push(FileFailure {
                            index,
                            path: path.clone(),
                            error,
                        });
                    }
                },
            }
        }

        batch.validate_alignment()?;
        Ok(failures)
    }

    /// Run the batch loop into a fresh accumulator
    pub fn run(&self, files: &[PathBuf]) -> Result<BatchOutcome, BatchError> {
        let mut batch = Batch::new();
        let failures = self.run_into(files, &mut batch)?;
        Ok(BatchOutcome { batch, failures })
    }

    fn process_one(&self, path: &Path) -> Result<RunBundle, PipelineError> {
        let raw = self.pipeline.read(path)?;
        let processed = self.pipeline.process(raw, self.config.window)?;
        self.pipeline
            .summarize(processed, self.config.ice_threshold_c)
    }
}
