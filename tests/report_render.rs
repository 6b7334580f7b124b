//! End-to-end test: demo files on disk through discovery, batch, and the
//! rendered outputs.

use renaflow::batch::{discover_inputs, BatchConfig, BatchRunner};
use renaflow::pipeline::{DemoRun, SyntheticPipeline};
use renaflow::report::{self, BatchSummary, ReportConfig};
use tempfile::tempdir;

#[test]
fn demo_batch_renders_a_complete_document() {
    let dir = tempdir().unwrap();
    let input_dir = dir.path().join("runs");
    std::fs::create_dir(&input_dir).unwrap();
    for index in 0..5 {
        DemoRun::generate(index, 42)
            .write_to(&input_dir.join(DemoRun::file_name(index)))
            .unwrap();
    }
    // A sibling non-export file must not be picked up.
    std::fs::write(input_dir.join("README.md"), "notes").unwrap();

    let files = discover_inputs(&input_dir, None).unwrap();
    assert_eq!(files.len(), 5);

    let pipeline = SyntheticPipeline::new();
    let outcome = BatchRunner::new(&pipeline, BatchConfig::default())
        .run(&files)
        .unwrap();
    assert_eq!(outcome.batch.len(), 5);

    let report_path = dir.path().join("perfusion_report.html");
    report::write_report(&outcome.batch, &ReportConfig::default(), &report_path).unwrap();

    let html = std::fs::read_to_string(&report_path).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert_eq!(html.matches("<svg").count(), 4);
    assert!(html.contains("Runs consolidated: 5"));
    assert!(html.contains("Mean flow vs mean resistance"));
    assert!(html.contains("Raw flow: run_004.txt"));
    assert!(html.contains("Smoothed flow: run_004.txt"));
    // Every run appears in the summary table.
    for index in 0..5 {
        assert!(html.contains(&DemoRun::file_name(index)));
    }

    let tables_dir = dir.path().join("tables");
    report::write_tables(&outcome.batch, &tables_dir).unwrap();
    for name in ["devices.csv", "organs.csv", "summaries.csv"] {
        let content = std::fs::read_to_string(tables_dir.join(name)).unwrap();
        assert_eq!(content.lines().count(), 6, "{name} should be header + 5 rows");
    }

    let digest = BatchSummary::new(&outcome.batch, outcome.failures.len());
    let text = digest.to_string();
    assert!(text.contains("Runs consolidated: 5"));
    assert!(text.contains("Mean flow (ml/min): median"));
    assert!(!text.contains("Files failed"));
}
