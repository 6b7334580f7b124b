use anyhow::{Context, Result};
use std::path::PathBuf;

use renaflow::batch::{discover_inputs, scan_inputs};
use renaflow::pipeline::SyntheticPipeline;

/// Check every input file against the read stage
pub fn run(input_dir: PathBuf, max_files: Option<usize>) -> Result<()> {
    let files = discover_inputs(&input_dir, max_files)
        .with_context(|| format!("Failed to list inputs in {}", input_dir.display()))?;
    if files.is_empty() {
        anyhow::bail!("no .txt export files found in {}", input_dir.display());
    }

    let pipeline = SyntheticPipeline::new();
    let report = scan_inputs(&pipeline, &files);

    print!("{}", report.format_colored());

    if report.has_failures() {
        anyhow::bail!(
            "{} of {} input files failed the read stage",
            report.failed_count(),
            report.entries.len()
        );
    }
    Ok(())
}
