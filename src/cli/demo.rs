use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use renaflow::pipeline::DemoRun;

/// Generate synthetic demo run files
pub fn run(output_dir: PathBuf, runs: usize, seed: u64) -> Result<()> {
    info!("renaflow - Demo Batch Generator");
    info!("===============================");

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    for index in 0..runs {
        let run = DemoRun::generate(index, seed);
        let path = output_dir.join(DemoRun::file_name(index));
        run.write_to(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(
            "  wrote {} ({} samples, serial {})",
            path.display(),
            run.rows.len(),
            run.header.serial
        );
    }

    println!(
        "Wrote {} demo runs to {}",
        runs,
        output_dir.display()
    );
    println!(
        "Next: renaflow report {} -o perfusion_report.html",
        output_dir.display()
    );
    Ok(())
}
