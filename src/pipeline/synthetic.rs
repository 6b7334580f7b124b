//! Synthetic pipeline over the crate's demo export format.
//!
//! `renaflow demo` writes deterministic run files; this module reads them
//! back through the full three-stage contract so the batch loop, report, and
//! tests can run without the external analysis package. The filter and the
//! aggregation here are deliberately minimal stand-ins for that package.

use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use log::debug;
use std::io::Write;
use std::path::Path;

use crate::model::{OrganSide, RunSummary};

use super::{
    assemble_records, Pipeline, PipelineError, ProcessedRun, RawRun, RunBundle, RunHeader,
};

/// Format marker on the first line of every demo export
pub const DEMO_MAGIC: &str = "# renaflow synthetic export 1";

/// Column header line preceding the sample rows
const COLUMN_HEADER: &str = "elapsed_s\tice_temp_c\tflow_ml_min\tpressure_mmhg";

/// One generated demo run: header plus sample rows
///
/// Generation is fully deterministic in `(index, seed)` so demo batches are
/// reproducible across machines. Waveforms are slow sinusoids with
/// sample-indexed jitter, which is enough texture for charts and statistics
/// without a randomness dependency.
#[derive(Debug, Clone)]
pub struct DemoRun {
    /// Export header written to the file
    pub header: RunHeader,
    /// Sample rows: elapsed seconds, ice temp, flow, pressure
    pub rows: Vec<[f64; 4]>,
}

impl DemoRun {
    /// Generate the demo run at `index` for a given seed
    pub fn generate(index: usize, seed: u64) -> DemoRun {
        let phase = seed as f64 * 0.013 + index as f64 * 0.61;
        let interval_s = 10.0;
        let samples = 600 + (index * 53) % 180;

        let base = Utc
            .with_ymd_and_hms(2026, 1, 15, 8, 30, 0)
            .single()
            .unwrap_or_else(Utc::now);
        let start_time = base + Duration::hours(18 * index as i64) + Duration::minutes((seed % 47) as i64);

        let flow_base = 84.0 + (index % 9) as f64 * 2.0;
        let mut rows = Vec::with_capacity(samples);
        for i in 0..samples {
            let t = i as f64 * interval_s;
            let ice = 1.6 + 0.5 * (t * 0.0011 + phase).sin() + 0.25 * (i as f64 * 0.291).sin();
            let flow = flow_base
                + 6.0 * (t * 0.002 + phase).sin()
                + 2.5 * (i as f64 * 0.437 + phase * 1.7).sin();
            let pressure =
                30.2 + 1.2 * (t * 0.0017).sin() + 0.8 * (i as f64 * 0.173 + phase).sin();
            rows.push([t, ice, flow, pressure]);
        }

        // Organ metadata is manually entered in the field; leave it blank on
        // some runs so downstream handling of missing values stays honest.
        let (side, blood_type, cross_clamp_time) = if index % 5 == 4 {
            (None, None, None)
        } else {
            let side = if index % 2 == 0 {
                OrganSide::Left
            } else {
                OrganSide::Right
            };
            let blood = ["O", "A", "B", "AB"][index % 4].to_string();
            let cross = start_time - Duration::minutes(147 + 9 * index as i64);
            (Some(side), Some(blood), Some(cross))
        };

        DemoRun {
            header: RunHeader {
                serial: format!("KPS-2201{:02}", 40 + index),
                model: Some("LifePort Kidney Transporter 1.1".to_string()),
                firmware: if index % 7 == 6 {
                    None
                } else {
                    Some("2.4.18".to_string())
                },
                start_time,
                sample_interval_s: interval_s,
                side,
                blood_type,
                cross_clamp_time,
            },
            rows,
        }
    }

    /// Conventional file name for the run at `index` (`run_001.txt`, ...)
    pub fn file_name(index: usize) -> String {
        format!("run_{:03}.txt", index + 1)
    }

    /// Render the run in the demo export format
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(DEMO_MAGIC);
        out.push('\n');
        out.push_str(&format!("serial: {}\n", self.header.serial));
        if let Some(model) = &self.header.model {
            out.push_str(&format!("device: {}\n", model));
        }
        if let Some(firmware) = &self.header.firmware {
            out.push_str(&format!("firmware: {}\n", firmware));
        }
        out.push_str(&format!(
            "start: {}\n",
            self.header
                .start_time
                .to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        out.push_str(&format!("interval_s: {}\n", self.header.sample_interval_s));
        if let Some(side) = self.header.side {
            out.push_str(&format!("side: {}\n", side));
        }
        if let Some(blood) = &self.header.blood_type {
            out.push_str(&format!("blood_type: {}\n", blood));
        }
        if let Some(cross) = self.header.cross_clamp_time {
            out.push_str(&format!(
                "cross_clamp: {}\n",
                cross.to_rfc3339_opts(SecondsFormat::Secs, true)
            ));
        }
        out.push('\n');
        out.push_str(COLUMN_HEADER);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&format!(
                "{}\t{:.3}\t{:.3}\t{:.3}\n",
                row[0], row[1], row[2], row[3]
            ));
        }
        out
    }

    /// Write the rendered run to `path`
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        let mut file = std::fs::File::create(path)?;
        file.write_all(self.render().as_bytes())
    }
}

/// Pipeline implementation for the demo export format
///
/// Stands in for the external analysis package: a line-based reader, a
/// centered moving-mean filter, and mean-based summary indicators.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticPipeline;

impl SyntheticPipeline {
    /// Create a new synthetic pipeline
    pub fn new() -> Self {
        Self
    }
}

impl Pipeline for SyntheticPipeline {
    fn read(&self, path: &Path) -> Result<RawRun, PipelineError> {
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Err(PipelineError::EmptyFile);
        }

        let source_file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut lines = content.lines().enumerate();

        match lines.next() {
            Some((_, first)) if first.trim() == DEMO_MAGIC => {}
            Some((_, first)) => {
                let mut preview = first.trim().to_string();
                preview.truncate(60);
                return Err(PipelineError::UnrecognizedFormat(preview));
            }
            None => return Err(PipelineError::EmptyFile),
        }

        let mut serial = None;
        let mut model = None;
        let mut firmware = None;
        let mut start_time = None;
        let mut interval_s = None;
        let mut side = None;
        let mut blood_type = None;
        let mut cross_clamp_time = None;

        // Header block: `key: value` lines up to the first blank line.
        let mut header_end = 1;
        for (idx, line) in lines.by_ref() {
            let lineno = idx + 1;
            header_end = lineno;
            let line = line.trim();
            if line.is_empty() {
                break;
            }

            let (key, value) = line.split_once(':').ok_or_else(|| PipelineError::Malformed {
                line: lineno,
                message: format!("expected `key: value`, got {:?}", line),
            })?;
            let value = value.trim();

            match key.trim() {
                "serial" => serial = Some(value.to_string()),
                "device" => model = Some(value.to_string()),
                "firmware" => firmware = Some(value.to_string()),
                "start" => start_time = Some(parse_timestamp(value, lineno)?),
                "interval_s" => {
                    interval_s = Some(value.parse::<f64>().map_err(|_| {
                        PipelineError::Malformed {
                            line: lineno,
                            message: format!("invalid sampling interval {:?}", value),
                        }
                    })?)
                }
                "side" => {
                    side = Some(match value.to_ascii_lowercase().as_str() {
                        "left" => OrganSide::Left,
                        "right" => OrganSide::Right,
                        other => {
                            return Err(PipelineError::Malformed {
                                line: lineno,
                                message: format!("invalid organ side {:?}", other),
                            })
                        }
                    })
                }
                "blood_type" => blood_type = Some(value.to_string()),
                "cross_clamp" => cross_clamp_time = Some(parse_timestamp(value, lineno)?),
                // Unknown keys are forward-compatible noise.
                other => debug!("ignoring unknown header field {:?}", other),
            }
        }

        let header = RunHeader {
            serial: serial.ok_or_else(|| PipelineError::MissingField("serial".to_string()))?,
            model,
            firmware,
            start_time: start_time
                .ok_or_else(|| PipelineError::MissingField("start".to_string()))?,
            sample_interval_s: interval_s
                .ok_or_else(|| PipelineError::MissingField("interval_s".to_string()))?,
            side,
            blood_type,
            cross_clamp_time,
        };

        // Column header, then tab-separated sample rows.
        match lines.next() {
            Some((_, line)) if line.trim() == COLUMN_HEADER => {}
            Some((idx, line)) => {
                return Err(PipelineError::Malformed {
                    line: idx + 1,
                    message: format!("expected column header, got {:?}", line.trim()),
                })
            }
            None => {
                return Err(PipelineError::Malformed {
                    line: header_end,
                    message: "missing column header".to_string(),
                })
            }
        }

        let mut elapsed_s = Vec::new();
        let mut ice_temp_c = Vec::new();
        let mut flow_ml_min = Vec::new();
        let mut pressure_mmhg = Vec::new();

        let mut last_line = header_end + 1;
        for (idx, line) in lines {
            let lineno = idx + 1;
            last_line = lineno;
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }

            let mut fields = line.split('\t');
            let mut next_field = |name: &str| -> Result<f64, PipelineError> {
                fields
                    .next()
                    .ok_or_else(|| PipelineError::Malformed {
                        line: lineno,
                        message: format!("missing {name} column"),
                    })?
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| PipelineError::Malformed {
                        line: lineno,
                        message: format!("invalid {name} value"),
                    })
            };

            elapsed_s.push(next_field("elapsed_s")?);
            ice_temp_c.push(next_field("ice_temp_c")?);
            flow_ml_min.push(next_field("flow_ml_min")?);
            pressure_mmhg.push(next_field("pressure_mmhg")?);
        }

        if elapsed_s.is_empty() {
            return Err(PipelineError::Malformed {
                line: last_line,
                message: "no sample rows".to_string(),
            });
        }

        let run = RawRun {
            header,
            source_file,
            elapsed_s,
            ice_temp_c,
            flow_ml_min,
            pressure_mmhg,
        };
        run.validate_contract()?;

        debug!("read {} samples from {}", run.len(), run.source_file);
        Ok(run)
    }

    fn process(&self, run: RawRun, window: usize) -> Result<ProcessedRun, PipelineError> {
        if window == 0 {
            return Err(PipelineError::InvalidParameter(
                "smoothing window must be at least 1 sample".to_string(),
            ));
        }
        if window % 2 == 0 {
            return Err(PipelineError::InvalidParameter(format!(
                "smoothing window must be odd, got {window}"
            )));
        }
        run.validate_contract()?;

        // Centered moving mean; the production filter belongs to the
        // external analysis package. Samples whose window runs off either
        // end of the sequence are trimmed to missing.
        let half = window / 2;
        let n = run.flow_ml_min.len();
        let mut flow_smoothed = vec![None; n];
        if n >= window {
            for i in half..n - half {
                let slice = &run.flow_ml_min[i - half..=i + half];
                flow_smoothed[i] = Some(slice.iter().sum::<f64>() / window as f64);
            }
        }

        let processed = ProcessedRun {
            raw: run,
            flow_smoothed,
            window,
        };
        processed.validate_contract()?;
        Ok(processed)
    }

    fn summarize(
        &self,
        run: ProcessedRun,
        ice_threshold_c: f64,
    ) -> Result<RunBundle, PipelineError> {
        if !ice_threshold_c.is_finite() {
            return Err(PipelineError::InvalidParameter(
                "ice threshold must be finite".to_string(),
            ));
        }
        run.validate_contract()?;

        let (device, organ, series) = assemble_records(&run);

        let interval_min = run.raw.header.sample_interval_s / 60.0;
        let below = run
            .raw
            .ice_temp_c
            .iter()
            .filter(|&&t| t.is_finite() && t < ice_threshold_c)
            .count();

        let resistance: Vec<f64> = run
            .raw
            .pressure_mmhg
            .iter()
            .zip(&run.raw.flow_ml_min)
            .filter(|(p, q)| p.is_finite() && q.is_finite() && **q > 1e-6)
            .map(|(p, q)| p / q)
            .collect();

        let summary = RunSummary {
            source_file: run.raw.source_file.clone(),
            serial: run.raw.header.serial.clone(),
            perfusion_min: device.duration_min,
            mean_ice_temp_c: channel_mean(&run.raw.ice_temp_c),
            mean_flow_ml_min: channel_mean(&run.raw.flow_ml_min),
            mean_pressure_mmhg: channel_mean(&run.raw.pressure_mmhg),
            mean_resistance: channel_mean(&resistance),
            minutes_below_ice_threshold: below as f64 * interval_min,
            ice_threshold_c,
        };

        Ok(RunBundle {
            device,
            organ,
            series,
            summary,
        })
    }
}

/// Mean over the finite values of a channel, `None` when there are none
fn channel_mean(values: &[f64]) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for &v in values {
        if v.is_finite() {
            sum += v;
            count += 1;
        }
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

fn parse_timestamp(value: &str, line: usize) -> Result<DateTime<Utc>, PipelineError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| PipelineError::Malformed {
            line,
            message: format!("invalid timestamp {:?}", value),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_run(dir: &Path, index: usize) -> std::path::PathBuf {
        let run = DemoRun::generate(index, 42);
        let path = dir.join(DemoRun::file_name(index));
        run.write_to(&path).unwrap();
        path
    }

    #[test]
    fn read_roundtrips_generated_run() {
        let dir = tempdir().unwrap();
        let generated = DemoRun::generate(0, 42);
        let path = write_run(dir.path(), 0);

        let run = SyntheticPipeline::new().read(&path).unwrap();

        assert_eq!(run.header.serial, generated.header.serial);
        assert_eq!(run.header.start_time, generated.header.start_time);
        assert_eq!(run.header.side, generated.header.side);
        assert_eq!(run.len(), generated.rows.len());
        assert_eq!(run.source_file, "run_001.txt");
        assert!((run.ice_temp_c[3] - generated.rows[3][1]).abs() < 1e-3);
    }

    #[test]
    fn read_rejects_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();

        let err = SyntheticPipeline::new().read(&path).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyFile));
    }

    #[test]
    fn read_rejects_foreign_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("other.txt");
        std::fs::write(&path, "LIFEPORT EXPORT V3\ngarbage\n").unwrap();

        let err = SyntheticPipeline::new().read(&path).unwrap_err();
        assert!(matches!(err, PipelineError::UnrecognizedFormat(_)));
    }

    #[test]
    fn read_requires_serial() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("noserial.txt");
        let content = format!(
            "{DEMO_MAGIC}\nstart: 2026-01-15T08:30:00Z\ninterval_s: 10\n\n{COLUMN_HEADER}\n0\t1.0\t90.0\t30.0\n"
        );
        std::fs::write(&path, content).unwrap();

        let err = SyntheticPipeline::new().read(&path).unwrap_err();
        match err {
            PipelineError::MissingField(field) => assert_eq!(field, "serial"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn read_reports_line_of_bad_sample() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("badrow.txt");
        let content = format!(
            "{DEMO_MAGIC}\nserial: KPS-1\nstart: 2026-01-15T08:30:00Z\ninterval_s: 10\n\n{COLUMN_HEADER}\n0\t1.0\t90.0\t30.0\n10\t1.1\tnot-a-number\t30.1\n"
        );
        std::fs::write(&path, content).unwrap();

        let err = SyntheticPipeline::new().read(&path).unwrap_err();
        match err {
            PipelineError::Malformed { line, message } => {
                assert_eq!(line, 8);
                assert!(message.contains("flow_ml_min"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn process_trims_window_boundaries() {
        let dir = tempdir().unwrap();
        let path = write_run(dir.path(), 1);
        let pipeline = SyntheticPipeline::new();

        let raw = pipeline.read(&path).unwrap();
        let n = raw.len();
        let processed = pipeline.process(raw, 5).unwrap();

        // None exactly at the leading and trailing half-window.
        assert!(processed.flow_smoothed[..2].iter().all(Option::is_none));
        assert!(processed.flow_smoothed[n - 2..].iter().all(Option::is_none));
        assert!(processed.flow_smoothed[2..n - 2].iter().all(Option::is_some));

        let valid = processed.flow_smoothed.iter().flatten().count();
        assert_eq!(valid, n - 4);
        assert!(valid < n);
    }

    #[test]
    fn process_rejects_even_window() {
        let dir = tempdir().unwrap();
        let path = write_run(dir.path(), 0);
        let pipeline = SyntheticPipeline::new();

        let raw = pipeline.read(&path).unwrap();
        let err = pipeline.process(raw, 4).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidParameter(_)));
    }

    #[test]
    fn summarize_computes_means_and_ice_minutes() {
        let pipeline = SyntheticPipeline::new();
        let header = RunHeader {
            serial: "KPS-TEST".to_string(),
            model: None,
            firmware: None,
            start_time: Utc.with_ymd_and_hms(2026, 1, 15, 8, 30, 0).single().unwrap(),
            sample_interval_s: 60.0,
            side: Some(OrganSide::Left),
            blood_type: Some("O".to_string()),
            cross_clamp_time: None,
        };
        let raw = RawRun {
            header,
            source_file: "constant.txt".to_string(),
            elapsed_s: vec![0.0, 60.0, 120.0, 180.0],
            ice_temp_c: vec![1.0, 5.0, 1.0, 1.0],
            flow_ml_min: vec![100.0, 100.0, 100.0, 100.0],
            pressure_mmhg: vec![30.0, 30.0, 30.0, 30.0],
        };

        let processed = pipeline.process(raw, 3).unwrap();
        let bundle = pipeline.summarize(processed, 4.0).unwrap();

        assert_eq!(bundle.summary.mean_flow_ml_min, Some(100.0));
        assert_eq!(bundle.summary.mean_pressure_mmhg, Some(30.0));
        assert_eq!(bundle.summary.mean_ice_temp_c, Some(2.0));
        let resistance = bundle.summary.mean_resistance.unwrap();
        assert!((resistance - 0.3).abs() < 1e-12);
        // Three of four samples sit below 4 °C at one minute per sample.
        assert_eq!(bundle.summary.minutes_below_ice_threshold, 3.0);
        assert_eq!(bundle.summary.perfusion_min, 3.0);

        assert_eq!(bundle.device.serial, "KPS-TEST");
        assert_eq!(bundle.series.len(), 4);
        assert_eq!(bundle.organ.blood_type.as_deref(), Some("O"));
        assert!(bundle.series.validate().is_ok());
    }

    #[test]
    fn generated_runs_vary_but_stay_deterministic() {
        let a = DemoRun::generate(2, 7);
        let b = DemoRun::generate(2, 7);
        let c = DemoRun::generate(3, 7);

        assert_eq!(a.render(), b.render());
        assert_ne!(a.header.serial, c.header.serial);
        assert_ne!(a.rows.len(), c.rows.len());
    }

    #[test]
    fn every_fifth_run_has_blank_organ_metadata() {
        let run = DemoRun::generate(4, 42);
        assert!(run.header.side.is_none());
        assert!(run.header.blood_type.is_none());
        assert!(run.header.cross_clamp_time.is_none());
    }
}
