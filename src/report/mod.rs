//! # Report Rendering
//!
//! Turns a consolidated [`Batch`] into the run's outputs:
//!
//! - one self-contained HTML document ([`render`] / [`write_report`]) with
//!   column-subset table previews, median/IQR statistics, and a 2×2 grid of
//!   inline SVG charts,
//! - a terminal digest ([`BatchSummary`]),
//! - optional CSV export of the three single-row-per-file tables
//!   ([`write_tables`]).
//!
//! The document embeds everything it needs; no external assets, scripts, or
//! stylesheets are referenced. All operator-entered text is HTML-escaped at
//! render time.

pub mod charts;
mod console;
mod error;
mod export;
mod html;

pub use console::BatchSummary;
pub use error::ReportError;
pub use export::write_tables;

use chrono::{DateTime, SecondsFormat, Utc};
use log::warn;
use std::fmt::Write as _;
use std::path::Path;

use crate::batch::Batch;
use crate::stats::{minutes_to_hours, summarize_column};

use html::{escape, table};

/// Parameters controlling report layout and chart selection
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Document title
    pub title: String,
    /// Rows shown in the device/organ table previews
    pub preview_rows: usize,
    /// Zero-based run whose time series is plotted
    pub series_index: usize,
    /// Samples of the selected series to plot
    pub series_window: usize,
    /// Bins in the summary histogram
    pub histogram_bins: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Hypothermic Machine Perfusion Batch Report".to_string(),
            preview_rows: 5,
            series_index: 3,
            series_window: 500,
            histogram_bins: 10,
        }
    }
}

/// Render the batch report as a self-contained HTML document
pub fn render(batch: &Batch, config: &ReportConfig) -> Result<String, ReportError> {
    if batch.is_empty() {
        return Err(ReportError::EmptyBatch);
    }

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = write!(out, "<title>{}</title>\n", escape(&config.title));
    out.push_str(STYLE);
    out.push_str("</head>\n<body>\n");

    let _ = write!(out, "<h1>{}</h1>\n", escape(&config.title));
    out.push_str(&metadata_section(batch));
    out.push_str(&device_preview_section(batch, config.preview_rows));
    out.push_str(&organ_preview_section(batch, config.preview_rows));
    out.push_str(&summary_table_section(batch));
    out.push_str(&statistics_section(batch));
    out.push_str(&charts_section(batch, config));

    let _ = write!(
        out,
        "<footer>Generated by renaflow {}</footer>\n",
        env!("CARGO_PKG_VERSION")
    );
    out.push_str("</body>\n</html>\n");
    Ok(out)
}

/// Render the report and write it to `path`
pub fn write_report(batch: &Batch, config: &ReportConfig, path: &Path) -> Result<(), ReportError> {
    let content = render(batch, config)?;
    std::fs::write(path, content)?;
    Ok(())
}

const STYLE: &str = "<style>\n\
body { font-family: Georgia, serif; max-width: 980px; margin: 2em auto; color: #222; }\n\
h1 { font-size: 1.5em; } h2 { font-size: 1.2em; margin-top: 1.6em; }\n\
table { border-collapse: collapse; font-size: 0.85em; margin: 0.8em 0; }\n\
th, td { border: 1px solid #ccc; padding: 4px 10px; text-align: left; }\n\
th { background: #f0f2f5; }\n\
p.note { color: #555; font-size: 0.9em; }\n\
ul.stats li { margin: 0.3em 0; }\n\
div.grid { display: grid; grid-template-columns: 1fr 1fr; gap: 14px; }\n\
svg.chart { width: 100%; height: auto; border: 1px solid #e4e4e4; }\n\
footer { margin-top: 2.5em; color: #888; font-size: 0.8em; }\n\
</style>\n";

fn fmt_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "n/a".to_string(),
    }
}

fn metadata_section(batch: &Batch) -> String {
    let total_hours: f64 = batch
        .summaries
        .iter()
        .map(|s| s.perfusion_min)
        .sum::<f64>()
        / 60.0;

    let mut section = String::new();
    section.push_str("<h2>Batch</h2>\n");
    let _ = write!(
        section,
        "<ul class=\"stats\">\n\
         <li>Runs consolidated: {}</li>\n\
         <li>Total perfusion time: {:.1} h</li>\n\
         <li>Generated: {}</li>\n\
         </ul>\n",
        batch.len(),
        total_hours,
        fmt_time(&Utc::now())
    );
    section.push_str(
        "<p class=\"note\">Device, organ, and summary tables hold one row per input file, \
         in input order; the time series for row <em>i</em> belongs to the same file as \
         row <em>i</em> of every table.</p>\n",
    );
    section
}

fn device_preview_section(batch: &Batch, preview_rows: usize) -> String {
    let rows: Vec<Vec<String>> = batch
        .devices
        .iter()
        .take(preview_rows)
        .map(|d| {
            vec![
                d.serial.clone(),
                d.model.clone().unwrap_or_else(|| "n/a".to_string()),
                fmt_time(&d.start_time),
                format!("{:.0}", d.duration_min),
                d.source_file.clone(),
            ]
        })
        .collect();

    let mut section = String::new();
    section.push_str("<h2>Devices</h2>\n");
    let _ = write!(
        section,
        "<p class=\"note\">First {} of {} runs.</p>\n",
        rows.len(),
        batch.len()
    );
    section.push_str(&table(
        &["Serial", "Model", "Start (UTC)", "Duration (min)", "Source file"],
        &rows,
    ));
    section
}

fn organ_preview_section(batch: &Batch, preview_rows: usize) -> String {
    let rows: Vec<Vec<String>> = batch
        .organs
        .iter()
        .take(preview_rows)
        .map(|o| {
            vec![
                o.side.map(|s| s.to_string()).unwrap_or_else(|| "n/a".to_string()),
                o.blood_type.clone().unwrap_or_else(|| "n/a".to_string()),
                o.cross_clamp_time
                    .as_ref()
                    .map(fmt_time)
                    .unwrap_or_else(|| "n/a".to_string()),
            ]
        })
        .collect();

    let mut section = String::new();
    section.push_str("<h2>Organs</h2>\n");
    section.push_str(
        "<p class=\"note\">Clinical fields are entered manually at the device and are \
         frequently left blank.</p>\n",
    );
    section.push_str(&table(&["Side", "Blood type", "Cross-clamp (UTC)"], &rows));
    section
}

fn summary_table_section(batch: &Batch) -> String {
    let rows: Vec<Vec<String>> = batch
        .summaries
        .iter()
        .map(|s| {
            vec![
                s.source_file.clone(),
                s.serial.clone(),
                format!("{:.0}", s.perfusion_min),
                fmt_opt(s.mean_ice_temp_c, 2),
                fmt_opt(s.mean_flow_ml_min, 1),
                fmt_opt(s.mean_pressure_mmhg, 1),
                fmt_opt(s.mean_resistance, 3),
                format!("{:.0}", s.minutes_below_ice_threshold),
            ]
        })
        .collect();

    let mut section = String::new();
    section.push_str("<h2>Run summaries</h2>\n");
    section.push_str(&table(
        &[
            "Source file",
            "Serial",
            "Perfusion (min)",
            "Ice temp (°C)",
            "Flow (ml/min)",
            "Pressure (mmHg)",
            "Resistance (mmHg·min/ml)",
            "On ice (min)",
        ],
        &rows,
    ));
    section
}

fn statistics_section(batch: &Batch) -> String {
    let flow_values: Vec<f64> = batch
        .summaries
        .iter()
        .filter_map(|s| s.mean_flow_ml_min)
        .collect();
    let duration_min: Vec<f64> = batch.summaries.iter().map(|s| s.perfusion_min).collect();

    let mut section = String::new();
    section.push_str("<h2>Descriptive statistics</h2>\n<ul class=\"stats\">\n");
    if let Some(flow) = summarize_column(&flow_values) {
        let _ = write!(section, "<li>Mean flow (ml/min): {}</li>\n", flow);
    }
    if let Some(duration) = summarize_column(&minutes_to_hours(&duration_min)) {
        let _ = write!(section, "<li>Perfusion time (h): {}</li>\n", duration);
    }
    section.push_str("</ul>\n");
    section
}

fn charts_section(batch: &Batch, config: &ReportConfig) -> String {
    let ice_means: Vec<f64> = batch
        .summaries
        .iter()
        .filter_map(|s| s.mean_ice_temp_c)
        .collect();

    let flow_vs_resistance: Vec<(f64, f64)> = batch
        .summaries
        .iter()
        .filter_map(|s| Some((s.mean_flow_ml_min?, s.mean_resistance?)))
        .collect();

    // Clamp the configured run to the batch; a short batch still renders.
    let index = config.series_index.min(batch.len() - 1);
    if index != config.series_index {
        warn!(
            "series index {} out of range, plotting run {} instead",
            config.series_index, index
        );
    }
    let selected = batch.series[index].head(config.series_window);

    let mut section = String::new();
    section.push_str("<h2>Charts</h2>\n<div class=\"grid\">\n");
    section.push_str(&charts::histogram(
        &ice_means,
        config.histogram_bins,
        "Mean ice-container temperature",
        "°C",
    ));
    section.push_str(&charts::scatter(
        &flow_vs_resistance,
        "Mean flow vs mean resistance",
        "ml/min",
        "mmHg·min/ml",
    ));
    section.push_str(&charts::line(
        &selected.elapsed_min,
        &selected.flow_ml_min,
        &format!("Raw flow: {}", selected.source_file),
        "min",
        "ml/min",
    ));
    section.push_str(&charts::line_optional(
        &selected.elapsed_min,
        &selected.flow_smoothed,
        &format!("Smoothed flow: {}", selected.source_file),
        "min",
        "ml/min",
    ));
    section.push_str("</div>\n");
    let _ = write!(
        section,
        "<p class=\"note\">Line plots show the first {} samples of run {}. The smoothed \
         channel starts and ends short of the raw channel where the filter window runs \
         off the sequence.</p>\n",
        selected.len(),
        index + 1
    );
    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{BatchConfig, BatchRunner};
    use crate::pipeline::{DemoRun, SyntheticPipeline};
    use tempfile::tempdir;

    fn small_batch(runs: usize) -> Batch {
        let dir = tempdir().unwrap();
        let files: Vec<_> = (0..runs)
            .map(|index| {
                let path = dir.path().join(DemoRun::file_name(index));
                DemoRun::generate(index, 11).write_to(&path).unwrap();
                path
            })
            .collect();

        let pipeline = SyntheticPipeline::new();
        BatchRunner::new(&pipeline, BatchConfig::default())
            .run(&files)
            .unwrap()
            .batch
    }

    #[test]
    fn render_rejects_empty_batch() {
        let err = render(&Batch::new(), &ReportConfig::default()).unwrap_err();
        assert!(matches!(err, ReportError::EmptyBatch));
    }

    #[test]
    fn render_contains_all_sections_and_charts() {
        let batch = small_batch(6);
        let html = render(&batch, &ReportConfig::default()).unwrap();

        assert!(html.contains("<h2>Batch</h2>"));
        assert!(html.contains("<h2>Devices</h2>"));
        assert!(html.contains("<h2>Organs</h2>"));
        assert!(html.contains("<h2>Run summaries</h2>"));
        assert!(html.contains("<h2>Descriptive statistics</h2>"));
        assert!(html.contains("<h2>Charts</h2>"));
        assert_eq!(html.matches("<svg").count(), 4);
        assert!(html.contains("Mean flow (ml/min): median"));
        assert!(html.contains("Perfusion time (h): median"));
        // Default selection is the fourth run.
        assert!(html.contains("Raw flow: run_004.txt"));
    }

    #[test]
    fn previews_are_truncated() {
        let batch = small_batch(8);
        let config = ReportConfig {
            preview_rows: 5,
            ..ReportConfig::default()
        };
        let html = render(&batch, &config).unwrap();

        assert!(html.contains("First 5 of 8 runs."));
        // Run 6 appears in the full summary table but not the device preview.
        let device_section = &html[html.find("<h2>Devices</h2>").unwrap()
            ..html.find("<h2>Organs</h2>").unwrap()];
        assert!(!device_section.contains("run_006.txt"));
    }

    #[test]
    fn series_index_clamps_to_short_batches() {
        let batch = small_batch(2);
        let html = render(&batch, &ReportConfig::default()).unwrap();
        assert!(html.contains("Raw flow: run_002.txt"));
    }

    #[test]
    fn write_report_creates_the_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.html");
        let batch = small_batch(4);

        write_report(&batch, &ReportConfig::default(), &path).unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("</html>"));
    }

    #[test]
    fn hostile_serials_are_escaped() {
        let mut batch = small_batch(4);
        batch.devices[0].serial = "KPS<script>alert(1)</script>".to_string();
        batch.summaries[0].serial = batch.devices[0].serial.clone();

        let html = render(&batch, &ReportConfig::default()).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("KPS&lt;script&gt;"));
    }
}
