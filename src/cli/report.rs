use anyhow::{Context, Result};
use log::info;

use renaflow::batch::{discover_inputs, BatchConfig, BatchRunner, ErrorPolicy};
use renaflow::pipeline::SyntheticPipeline;
use renaflow::report::{self, BatchSummary, ReportConfig};

use super::{Config, ReportArgs};

/// Run the batch over an input directory and write the report
pub fn run(args: ReportArgs) -> Result<()> {
    let file_config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    // Precedence: defaults, then config file, then CLI flags.
    let defaults = BatchConfig::default();
    let batch_config = BatchConfig {
        window: args
            .window
            .or(file_config.batch.window)
            .unwrap_or(defaults.window),
        ice_threshold_c: args
            .ice_threshold
            .or(file_config.batch.ice_threshold_c)
            .unwrap_or(defaults.ice_threshold_c),
        max_files: args.max_files.or(file_config.batch.max_files),
        on_error: if args.keep_going || file_config.batch.keep_going.unwrap_or(false) {
            ErrorPolicy::KeepGoing
        } else {
            ErrorPolicy::FailFast
        },
    };

    let report_defaults = ReportConfig::default();
    let report_config = ReportConfig {
        preview_rows: file_config
            .report
            .preview_rows
            .unwrap_or(report_defaults.preview_rows),
        series_index: args
            .series_index
            .or(file_config.report.series_index)
            .unwrap_or(report_defaults.series_index),
        series_window: args
            .series_window
            .or(file_config.report.series_window)
            .unwrap_or(report_defaults.series_window),
        histogram_bins: file_config
            .report
            .histogram_bins
            .unwrap_or(report_defaults.histogram_bins),
        ..report_defaults
    };

    let files = discover_inputs(&args.input_dir, batch_config.max_files)
        .with_context(|| format!("Failed to list inputs in {}", args.input_dir.display()))?;
    if files.is_empty() {
        anyhow::bail!(
            "no .txt export files found in {}",
            args.input_dir.display()
        );
    }

    info!("renaflow - Perfusion Batch Report");
    info!("=================================");
    info!("Input:  {}", args.input_dir.display());
    info!("Output: {}", args.output.display());
    info!("Files:  {}", files.len());
    info!("Window: {} samples", batch_config.window);
    info!("Ice threshold: {} °C", batch_config.ice_threshold_c);

    let pipeline = SyntheticPipeline::new();
    let runner = BatchRunner::new(&pipeline, batch_config);
    let outcome = runner
        .run(&files)
        .context("Batch aborted; run `renaflow scan` to locate the offending file")?;

    report::write_report(&outcome.batch, &report_config, &args.output)
        .with_context(|| format!("Failed to write report to {}", args.output.display()))?;
    info!("Report written to {}", args.output.display());

    if let Some(dir) = &args.export_tables {
        report::write_tables(&outcome.batch, dir)
            .with_context(|| format!("Failed to export tables to {}", dir.display()))?;
    }

    let summary = BatchSummary::new(&outcome.batch, outcome.failures.len());
    print!("{}", summary.format_colored());

    Ok(())
}
