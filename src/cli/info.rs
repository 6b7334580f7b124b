use anyhow::{Context, Result};
use std::path::PathBuf;

use renaflow::pipeline::{Pipeline, SyntheticPipeline};

/// Display the parsed records of a single export file
pub fn run(file: PathBuf, window: usize, ice_threshold: f64) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let pipeline = SyntheticPipeline::new();
    let raw = pipeline
        .read(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let processed = pipeline
        .process(raw, window)
        .context("Failed to process run")?;
    let bundle = pipeline
        .summarize(processed, ice_threshold)
        .context("Failed to summarize run")?;

    println!("Export File Information");
    println!("=======================");
    println!("File: {}", file.display());
    println!();

    println!("Device:");
    println!("  Serial: {}", bundle.device.serial);
    if let Some(model) = &bundle.device.model {
        println!("  Model: {}", model);
    }
    if let Some(firmware) = &bundle.device.firmware {
        println!("  Firmware: {}", firmware);
    }
    println!("  Start: {}", bundle.device.start_time);
    println!("  Stop:  {}", bundle.device.stop_time);
    println!("  Duration: {:.0} min", bundle.device.duration_min);
    println!();

    println!("Organ:");
    match bundle.organ.side {
        Some(side) => println!("  Side: {}", side),
        None => println!("  Side: not recorded"),
    }
    match &bundle.organ.blood_type {
        Some(blood) => println!("  Blood type: {}", blood),
        None => println!("  Blood type: not recorded"),
    }
    match bundle.organ.cross_clamp_time {
        Some(t) => println!("  Cross-clamp: {}", t),
        None => println!("  Cross-clamp: not recorded"),
    }
    println!();

    println!("Time series:");
    println!("  Samples: {}", bundle.series.len());
    println!(
        "  Smoothed values: {} (window {} trims {} per side)",
        bundle.series.smoothed_valid_count(),
        window,
        window / 2
    );
    println!();

    println!("{}", bundle.summary);

    Ok(())
}
