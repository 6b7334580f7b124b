//! # renaflow - Machine-Perfusion Batch Analysis
//!
//! `renaflow` turns a directory of raw log files exported by a hypothermic
//! kidney-perfusion device into a single reproducible report: consolidated
//! per-run tables, descriptive statistics, and a self-contained HTML document
//! with embedded charts.
//!
//! ## Key Ideas
//!
//! - **Opaque pipeline boundary**: the hard work — parsing the vendor export,
//!   filtering sensor channels, computing per-run summary indicators — lives
//!   behind the three-operation [`pipeline::Pipeline`] trait
//!   (read → process → summarize). renaflow sequences those calls, it does
//!   not reimplement them.
//!
//! - **Order-joined tables**: each successfully processed file contributes
//!   exactly one device record, one organ record, one time-series table, and
//!   one summary record. The four collections are kept in input order, and
//!   that order is the join key.
//!
//! - **Fail-fast by default**: a corrupt or empty file aborts the batch with
//!   the failing index and path. Per-file isolation is an explicit opt-in
//!   ([`batch::ErrorPolicy::KeepGoing`]).
//!
//! - **Self-contained output**: the report is one HTML file with inline SVG
//!   charts — no external assets, no machine-readable side channel unless CSV
//!   export is requested.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use renaflow::batch::{discover_inputs, BatchConfig, BatchRunner};
//! use renaflow::pipeline::SyntheticPipeline;
//! use renaflow::report::{self, ReportConfig};
//!
//! let files = discover_inputs("runs/".as_ref(), None)?;
//!
//! let pipeline = SyntheticPipeline::new();
//! let runner = BatchRunner::new(&pipeline, BatchConfig::default());
//! let outcome = runner.run(&files)?;
//!
//! let html = report::render(&outcome.batch, &ReportConfig::default())?;
//! std::fs::write("report.html", html)?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`model`]: the four record kinds produced per run (device, organ,
//!   time series, summary)
//! - [`pipeline`]: the read/process/summarize boundary and the synthetic
//!   implementation used for demos and tests
//! - [`batch`]: input discovery, the sequential ingestion loop, the
//!   consolidated table set, and the per-file scan tool
//! - [`stats`]: median/quartile point estimates for the report
//! - [`report`]: HTML rendering, SVG charts, terminal digest, CSV export

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod batch;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod stats;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::batch::{
        discover_inputs, Batch, BatchConfig, BatchError, BatchOutcome, BatchRunner, ErrorPolicy,
        FileFailure, ScanReport, ScanStatus,
    };
    pub use crate::model::{
        DeviceRecord, ModelError, OrganRecord, OrganSide, RunSummary, TimeSeries,
    };
    pub use crate::pipeline::{
        Pipeline, PipelineError, ProcessedRun, RawRun, RunBundle, RunHeader, SyntheticPipeline,
    };
    pub use crate::report::{BatchSummary, ReportConfig, ReportError};
    pub use crate::stats::{quartiles, ColumnSummary, Quartiles};
}
