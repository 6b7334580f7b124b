use chrono::{TimeZone, Utc};

use super::*;

fn sample_series(n: usize) -> TimeSeries {
    let start = Utc.with_ymd_and_hms(2026, 1, 15, 8, 30, 0).single().unwrap();
    TimeSeries {
        source_file: "run_001.txt".to_string(),
        clock: (0..n)
            .map(|i| start + chrono::Duration::seconds(10 * i as i64))
            .collect(),
        elapsed_min: (0..n).map(|i| i as f64 * 10.0 / 60.0).collect(),
        ice_temp_c: vec![2.5; n],
        flow_ml_min: vec![90.0; n],
        pressure_mmhg: vec![30.0; n],
        flow_smoothed: (0..n)
            .map(|i| if i == 0 || i == n - 1 { None } else { Some(90.0) })
            .collect(),
    }
}

#[test]
fn device_record_json_roundtrip() {
    let record = DeviceRecord {
        serial: "KPS-220143".to_string(),
        model: Some("LifePort Kidney Transporter 1.1".to_string()),
        firmware: None,
        start_time: Utc.with_ymd_and_hms(2026, 1, 15, 8, 30, 0).single().unwrap(),
        stop_time: Utc.with_ymd_and_hms(2026, 1, 15, 14, 30, 0).single().unwrap(),
        duration_min: 360.0,
        source_file: "run_001.txt".to_string(),
    };

    let json = record.to_json().unwrap();
    let back = DeviceRecord::from_json(&json).unwrap();

    assert_eq!(back.serial, "KPS-220143");
    assert_eq!(back.start_time, record.start_time);
    assert_eq!(back.duration_min, 360.0);
}

#[test]
fn organ_record_defaults_to_all_missing() {
    let record = OrganRecord::default();
    assert!(record.side.is_none());
    assert!(record.blood_type.is_none());
    assert!(record.cross_clamp_time.is_none());

    // Missing fields survive a JSON roundtrip as missing, not as errors.
    let back = OrganRecord::from_json(&record.to_json().unwrap()).unwrap();
    assert!(back.side.is_none());
}

#[test]
fn organ_side_serializes_lowercase() {
    let json = serde_json::to_string(&OrganSide::Left).unwrap();
    assert_eq!(json, "\"left\"");
    assert_eq!(OrganSide::Right.to_string(), "right");
}

#[test]
fn series_validate_accepts_aligned_columns() {
    let series = sample_series(12);
    assert!(series.validate().is_ok());
    assert_eq!(series.len(), 12);
    assert_eq!(series.smoothed_valid_count(), 10);
}

#[test]
fn series_validate_rejects_short_column() {
    let mut series = sample_series(12);
    series.pressure_mmhg.pop();

    let err = series.validate().unwrap_err();
    match err {
        ModelError::ColumnLengthMismatch {
            column,
            actual,
            expected,
        } => {
            assert_eq!(column, "pressure_mmhg");
            assert_eq!(actual, 11);
            assert_eq!(expected, 12);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn series_head_truncates_all_columns() {
    let series = sample_series(12);
    let head = series.head(5);
    assert_eq!(head.len(), 5);
    assert!(head.validate().is_ok());
    assert_eq!(head.source_file, series.source_file);

    // Asking for more rows than exist returns the full series.
    assert_eq!(series.head(100).len(), 12);
}

#[test]
fn run_summary_display_mentions_threshold() {
    let summary = RunSummary {
        source_file: "run_001.txt".to_string(),
        serial: "KPS-220143".to_string(),
        perfusion_min: 360.0,
        mean_ice_temp_c: Some(1.8),
        mean_flow_ml_min: Some(92.5),
        mean_pressure_mmhg: Some(30.2),
        mean_resistance: Some(0.33),
        minutes_below_ice_threshold: 341.5,
        ice_threshold_c: 4.0,
    };

    let text = summary.to_string();
    assert!(text.contains("run_001.txt"));
    assert!(text.contains("92.5 ml/min"));
    assert!(text.contains("Below 4.0 °C"));
}
