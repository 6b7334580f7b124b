//! TOML configuration file support for batch and report settings.
//!
//! Instead of passing many CLI flags, users can specify settings in a
//! config file:
//!
//! ```toml
//! # renaflow.toml
//! [batch]
//! window = 9
//! ice_threshold_c = 4.0
//! max_files = 20
//! keep_going = false
//!
//! [report]
//! preview_rows = 5
//! series_index = 3
//! series_window = 500
//! histogram_bins = 10
//! ```
//!
//! CLI flags take precedence over file values.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Root configuration structure for renaflow.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Batch-loop settings.
    #[serde(default)]
    pub batch: BatchSection,

    /// Report-layout settings.
    #[serde(default)]
    pub report: ReportSection,
}

/// Configuration for the batch loop.
#[derive(Debug, Default, Deserialize)]
pub struct BatchSection {
    /// Smoothing window for the process stage, in samples.
    pub window: Option<usize>,

    /// Ice-classification threshold in °C.
    pub ice_threshold_c: Option<f64>,

    /// Process only the first N discovered files.
    pub max_files: Option<usize>,

    /// Record per-file failures and continue instead of aborting.
    pub keep_going: Option<bool>,
}

/// Configuration for report layout and chart selection.
#[derive(Debug, Default, Deserialize)]
pub struct ReportSection {
    /// Rows shown in the device/organ table previews.
    pub preview_rows: Option<usize>,

    /// Zero-based run whose time series is plotted.
    pub series_index: Option<usize>,

    /// Samples of the selected series to plot.
    pub series_window: Option<usize>,

    /// Bins in the summary histogram.
    pub histogram_bins: Option<usize>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
