//! End-to-end tests over the public API using real files

use toolbench::prelude::*;
use toolbench::records::{correctness_path, scored_path};

const FIXTURE: &str = r#"{"prompt":"What is 2+2?","expected_output":"4","with_tools":"4","without_tools":"Four","with_tools_duration_ms":100,"without_tools_duration_ms":200,"with_tools_length":1,"without_tools_length":4,"with_tools_correct":true,"without_tools_correct":true,"model":"m-1"}

{"prompt":"Capital of France?","expected_output":"Paris","with_tools":"Paris","without_tools":"Lyon","with_tools_duration_ms":100,"without_tools_duration_ms":200,"with_tools_length":5,"without_tools_length":4,"with_tools_correct":true,"without_tools_correct":false,"model":"m-1"}
{"prompt":"Largest planet?","expected_output":"Jupiter","with_tools":"Jupiter","without_tools":"Saturn","with_tools_duration_ms":100,"without_tools_duration_ms":200,"with_tools_length":7,"without_tools_length":6,"model":"m-1"}
{"prompt":"Speed of light?","expected_output":"299792458 m/s","with_tools":"c","without_tools":"fast","with_tools_duration_ms":100,"without_tools_duration_ms":200,"with_tools_length":1,"without_tools_length":4,"model":"m-1"}
"#;

fn write_fixture(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("run.jsonl");
    std::fs::write(&path, FIXTURE).unwrap();
    path
}

#[test]
fn test_load_save_reload_preserves_records() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path());

    let records = load_records(&input).unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].prompt, "What is 2+2?");
    assert_eq!(records[3].prompt, "Speed of light?");

    let copy = dir.path().join("copy.jsonl");
    save_records(&copy, &records).unwrap();
    let reloaded = load_records(&copy).unwrap();
    assert_eq!(reloaded, records);
    assert_eq!(reloaded[2].extra["model"], "m-1");
}

#[test]
fn test_report_over_partially_judged_file() {
    let dir = tempfile::tempdir().unwrap();
    let records = load_records(write_fixture(dir.path())).unwrap();
    let report = ComparisonReport::from_records(&records);

    assert_eq!(report.total_records, 4);
    assert_eq!(report.time_delta_pct, Some(50.0));

    // Unjudged records still count in the denominator
    let correctness = report.correctness.as_ref().unwrap();
    assert_eq!(correctness.accuracy_pct.with_tools, Some(50.0));
    assert_eq!(correctness.accuracy_pct.without_tools, Some(25.0));

    // No with-tools answer was judged wrong
    assert_eq!(correctness.with_tools_length.correct, Some(3.0));
    assert_eq!(correctness.with_tools_length.incorrect, None);
    assert_eq!(correctness.without_tools_length.incorrect, Some(4.0));
}

#[test]
fn test_emit_all_views_for_judged_file() {
    let dir = tempfile::tempdir().unwrap();
    let records = load_records(write_fixture(dir.path())).unwrap();
    let report = ComparisonReport::from_records(&records);

    let out = dir.path().join("nested").join("charts");
    let written = ChartEmitter::new(Config::default().charts)
        .emit(&records, &report, &out)
        .unwrap();

    assert_eq!(written.len(), 6);
    for path in &written {
        let svg = std::fs::read_to_string(path).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}

#[test]
fn test_derived_output_names() {
    let input = std::path::Path::new("results/run.jsonl");
    assert_eq!(scored_path(input), std::path::Path::new("results/run_scored.jsonl"));
    assert_eq!(
        correctness_path(input),
        std::path::Path::new("results/run_with_correctness.jsonl")
    );
}
