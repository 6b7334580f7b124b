//! CSV export of the consolidated single-row-per-file tables.
//!
//! The rendered HTML document is the primary output; CSV export is an
//! explicit opt-in for downstream tooling. The time-series tables are not
//! exported — they are per-run, not per-file, and belong to the pipeline's
//! own storage story.

use log::info;
use std::path::Path;

use crate::batch::Batch;

use super::ReportError;

/// Write `devices.csv`, `organs.csv`, and `summaries.csv` into `dir`
///
/// The directory is created when missing. Row order matches the batch, so
/// the positional join across the three files is preserved.
pub fn write_tables(batch: &Batch, dir: &Path) -> Result<(), ReportError> {
    std::fs::create_dir_all(dir)?;

    let devices_path = dir.join("devices.csv");
    let mut writer = csv::Writer::from_path(&devices_path)?;
    for record in &batch.devices {
        writer.serialize(record)?;
    }
    writer.flush()?;

    let organs_path = dir.join("organs.csv");
    let mut writer = csv::Writer::from_path(&organs_path)?;
    for record in &batch.organs {
        writer.serialize(record)?;
    }
    writer.flush()?;

    let summaries_path = dir.join("summaries.csv");
    let mut writer = csv::Writer::from_path(&summaries_path)?;
    for record in &batch.summaries {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!(
        "exported {} rows to {}, {}, {}",
        batch.len(),
        devices_path.display(),
        organs_path.display(),
        summaries_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{BatchConfig, BatchRunner};
    use crate::pipeline::{DemoRun, SyntheticPipeline};
    use tempfile::tempdir;

    #[test]
    fn exports_three_aligned_tables() {
        let dir = tempdir().unwrap();
        let mut files = Vec::new();
        for index in 0..3 {
            let path = dir.path().join(DemoRun::file_name(index));
            DemoRun::generate(index, 5).write_to(&path).unwrap();
            files.push(path);
        }

        let pipeline = SyntheticPipeline::new();
        let outcome = BatchRunner::new(&pipeline, BatchConfig::default())
            .run(&files)
            .unwrap();

        let out = dir.path().join("tables");
        write_tables(&outcome.batch, &out).unwrap();

        for name in ["devices.csv", "organs.csv", "summaries.csv"] {
            let content = std::fs::read_to_string(out.join(name)).unwrap();
            // Header plus one row per run.
            assert_eq!(content.lines().count(), 4, "{name}: {content}");
        }

        let devices = std::fs::read_to_string(out.join("devices.csv")).unwrap();
        assert!(devices.contains("run_001.txt"));
        assert!(devices.contains("KPS-220140"));
    }
}
