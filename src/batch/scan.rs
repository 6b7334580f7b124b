//! Per-file readability scan.
//!
//! A corrupt file in a fail-fast batch has to be located and removed by
//! hand. The scan runs only the read stage over every input and reports
//! which files would survive a batch, without consolidating anything.

use std::fmt;
use std::path::PathBuf;

#[cfg(feature = "colorized_output")]
use console::style;

use crate::pipeline::Pipeline;

/// Outcome of the read stage for one scanned file
#[derive(Debug, Clone)]
pub enum ScanStatus {
    /// File parsed; holds the number of samples read
    Readable {
        /// Samples in the parsed run
        samples: usize,
    },
    /// File failed the read stage
    Failed(String),
}

impl ScanStatus {
    fn is_readable(&self) -> bool {
        matches!(self, ScanStatus::Readable { .. })
    }
}

/// Scan result for one input file
#[derive(Debug, Clone)]
pub struct ScanEntry {
    /// Path of the scanned file
    pub path: PathBuf,
    /// Read-stage outcome
    pub status: ScanStatus,
}

/// Read-stage scan over a set of input files
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Per-file entries, in input order
    pub entries: Vec<ScanEntry>,
}

impl ScanReport {
    /// Number of files that parsed
    pub fn readable_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status.is_readable())
            .count()
    }

    /// Number of files that failed the read stage
    pub fn failed_count(&self) -> usize {
        self.entries.len() - self.readable_count()
    }

    /// True when at least one file failed
    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }

    /// Format the report with colors (requires the console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = String::new();
            output.push_str(&format!("{}\n", style("Input Scan").bold().cyan()));
            output.push_str(&format!("{}\n", style("==========").cyan()));

            for entry in &self.entries {
                match &entry.status {
                    ScanStatus::Readable { samples } => {
                        output.push_str(&format!(
                            "[{}] {} ({} samples)\n",
                            style("✓").green(),
                            entry.path.display(),
                            samples
                        ));
                    }
                    ScanStatus::Failed(message) => {
                        output.push_str(&format!(
                            "[{}] {} - {}: {}\n",
                            style("✗").red(),
                            entry.path.display(),
                            style("FAILED").red().bold(),
                            message
                        ));
                    }
                }
            }

            output.push('\n');
            output.push_str(&format!(
                "{}: {} readable, {} failed\n",
                style("Summary").bold(),
                style(self.readable_count()).green(),
                style(self.failed_count()).red()
            ));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Input Scan")?;
        writeln!(f, "==========")?;

        for entry in &self.entries {
            match &entry.status {
                ScanStatus::Readable { samples } => {
                    writeln!(f, "[✓] {} ({} samples)", entry.path.display(), samples)?;
                }
                ScanStatus::Failed(message) => {
                    writeln!(f, "[✗] {} - FAILED: {}", entry.path.display(), message)?;
                }
            }
        }

        writeln!(f)?;
        write!(
            f,
            "Summary: {} readable, {} failed",
            self.readable_count(),
            self.failed_count()
        )
    }
}

/// Run the read stage over every file and collect a [`ScanReport`]
pub fn scan_inputs<P: Pipeline>(pipeline: &P, files: &[PathBuf]) -> ScanReport {
    let mut report = ScanReport::default();
    for path in files {
        let status = match pipeline.read(path) {
            Ok(run) => ScanStatus::Readable { samples: run.len() },
            Err(error) => ScanStatus::Failed(error.to_string()),
        };
        report.entries.push(ScanEntry {
            path: path.clone(),
            status,
        });
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{DemoRun, SyntheticPipeline};
    use tempfile::tempdir;

    #[test]
    fn scan_flags_the_corrupt_file() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("run_001.txt");
        DemoRun::generate(0, 1).write_to(&good).unwrap();
        let bad = dir.path().join("run_002.txt");
        std::fs::write(&bad, "").unwrap();

        let report = scan_inputs(&SyntheticPipeline::new(), &[good, bad.clone()]);

        assert_eq!(report.readable_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert!(report.has_failures());

        let text = report.to_string();
        assert!(text.contains("run_002.txt"));
        assert!(text.contains("FAILED"));
        assert!(text.contains("1 readable, 1 failed"));
    }
}
