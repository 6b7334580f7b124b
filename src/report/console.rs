//! Terminal-facing digest of a completed batch.

use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

use crate::batch::Batch;
use crate::stats::{minutes_to_hours, summarize_column, ColumnSummary};

/// Summary statistics about a consolidated batch
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// Number of runs consolidated
    pub runs: usize,
    /// Number of input files that failed a pipeline stage
    pub failed_files: usize,
    /// Sum of perfusion time across runs, in hours
    pub total_perfusion_hours: f64,
    /// Median/IQR digest of mean flow in ml/min
    pub flow: Option<ColumnSummary>,
    /// Median/IQR digest of perfusion time in hours
    pub duration_hours: Option<ColumnSummary>,
}

impl BatchSummary {
    /// Compute the digest of a batch, recording `failed_files` alongside
    pub fn new(batch: &Batch, failed_files: usize) -> Self {
        let flow_values: Vec<f64> = batch
            .summaries
            .iter()
            .filter_map(|s| s.mean_flow_ml_min)
            .collect();
        let duration_min: Vec<f64> = batch.summaries.iter().map(|s| s.perfusion_min).collect();

        BatchSummary {
            runs: batch.len(),
            failed_files,
            total_perfusion_hours: duration_min.iter().sum::<f64>() / 60.0,
            flow: summarize_column(&flow_values),
            duration_hours: summarize_column(&minutes_to_hours(&duration_min)),
        }
    }

    /// Format the digest with colors (requires the console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut out = String::new();
            out.push_str(&format!(
                "{}\n",
                style("Perfusion Batch Summary").bold().cyan()
            ));
            out.push_str(&format!("{}\n", style("=======================").cyan()));
            out.push_str(&format!(
                "{}: {}\n",
                style("Runs consolidated").bold(),
                style(self.runs).green()
            ));
            if self.failed_files > 0 {
                out.push_str(&format!(
                    "{}: {}\n",
                    style("Files failed").bold(),
                    style(self.failed_files).red()
                ));
            }
            out.push_str(&format!(
                "Total perfusion time: {:.1} h\n",
                self.total_perfusion_hours
            ));
            if let Some(flow) = &self.flow {
                out.push_str(&format!("Mean flow (ml/min): {}\n", flow));
            }
            if let Some(duration) = &self.duration_hours {
                out.push_str(&format!("Perfusion time (h): {}\n", duration));
            }
            out
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Perfusion Batch Summary")?;
        writeln!(f, "=======================")?;
        writeln!(f, "Runs consolidated: {}", self.runs)?;
        if self.failed_files > 0 {
            writeln!(f, "Files failed: {}", self.failed_files)?;
        }
        writeln!(
            f,
            "Total perfusion time: {:.1} h",
            self.total_perfusion_hours
        )?;
        if let Some(flow) = &self.flow {
            writeln!(f, "Mean flow (ml/min): {}", flow)?;
        }
        if let Some(duration) = &self.duration_hours {
            writeln!(f, "Perfusion time (h): {}", duration)?;
        }
        Ok(())
    }
}
