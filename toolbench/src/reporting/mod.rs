//! Results reporting

pub mod charts;

pub use charts::{Bar, ChartEmitter, ChartError, ChartView, Series};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analysis::{ComparisonReport, CorrectnessSplit};

/// JSON summary export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    pub timestamp: String,
    pub source_file: String,
    pub charts: Vec<String>,
    pub report: ComparisonReport,
}

impl JsonSummary {
    pub fn new(source_file: impl AsRef<Path>, charts: &[impl AsRef<Path>], report: &ComparisonReport) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            source_file: source_file.as_ref().display().to_string(),
            charts: charts
                .iter()
                .filter_map(|p| p.as_ref().file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect(),
            report: report.clone(),
        }
    }

    /// Write to JSON file
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }
}

/// Format the statistics block shown after chart generation
pub fn format_console_report(report: &ComparisonReport) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Analyzed {} test cases", report.total_records));
    lines.push(format!(
        "Time:   {} vs {}",
        whole(report.mean_time_ms.with_tools, "ms"),
        whole(report.mean_time_ms.without_tools, "ms")
    ));
    lines.push(format!(
        "Length: {} vs {} chars",
        whole(report.mean_length.with_tools, ""),
        whole(report.mean_length.without_tools, "")
    ));
    lines.push(format!(
        "Tools: {} time, {} length",
        signed_pct(report.time_delta_pct),
        signed_pct(report.length_delta_pct)
    ));

    if let Some(correctness) = &report.correctness {
        lines.push(format!(
            "Accuracy: {} vs {}",
            pct(correctness.accuracy_pct.with_tools),
            pct(correctness.accuracy_pct.without_tools)
        ));
        if let Some(line) = split_line("With Tools", &correctness.with_tools_length) {
            lines.push(line);
        }
        if let Some(line) = split_line("Without Tools", &correctness.without_tools_length) {
            lines.push(line);
        }
    }

    lines.join("\n")
}

/// Print the statistics block to stdout
pub fn print_console_report(report: &ComparisonReport) {
    println!("{}", format_console_report(report));
}

fn split_line(label: &str, split: &CorrectnessSplit) -> Option<String> {
    match (split.correct, split.incorrect) {
        (Some(correct), Some(wrong)) => Some(format!(
            "{} - Correct: {:.0} chars, Wrong: {:.0} chars",
            label, correct, wrong
        )),
        _ => None,
    }
}

fn whole(value: Option<f64>, unit: &str) -> String {
    value.map(|v| format!("{:.0}{}", v, unit)).unwrap_or_else(|| "n/a".to_string())
}

fn pct(value: Option<f64>) -> String {
    value.map(|v| format!("{:.1}%", v)).unwrap_or_else(|| "n/a".to_string())
}

fn signed_pct(value: Option<f64>) -> String {
    value.map(|v| format!("{:+.0}%", v)).unwrap_or_else(|| "n/a".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{BenchmarkRecord, Verdict};

    #[test]
    fn test_console_report_without_correctness() {
        let records = vec![
            BenchmarkRecord::new("q1", "a", "1234", "12345678").with_durations(100, 200),
            BenchmarkRecord::new("q2", "a", "12", "1234").with_durations(100, 200),
        ];
        let text = format_console_report(&ComparisonReport::from_records(&records));

        assert_eq!(
            text,
            "Analyzed 2 test cases\n\
             Time:   100ms vs 200ms\n\
             Length: 3 vs 6 chars\n\
             Tools: +50% time, +50% length"
        );
    }

    #[test]
    fn test_console_report_with_correctness() {
        let records = vec![
            BenchmarkRecord::new("q1", "a", "1234", "12")
                .with_durations(10, 10)
                .with_verdicts(Verdict::Correct, Verdict::Correct),
            BenchmarkRecord::new("q2", "a", "12", "1234")
                .with_durations(10, 10)
                .with_verdicts(Verdict::Incorrect, Verdict::Correct),
            BenchmarkRecord::new("q3", "a", "1", "1").with_durations(10, 10),
            BenchmarkRecord::new("q4", "a", "1", "1").with_durations(10, 10),
        ];
        let text = format_console_report(&ComparisonReport::from_records(&records));

        assert!(text.contains("Tools: +0% time"));
        assert!(text.contains("Accuracy: 25.0% vs 50.0%"));
        assert!(text.contains("With Tools - Correct: 4 chars, Wrong: 2 chars"));
        // No wrong without-tools answers, so no breakdown line for it
        assert!(!text.contains("Without Tools - Correct"));
    }

    #[test]
    fn test_console_report_empty() {
        let text = format_console_report(&ComparisonReport::from_records(&[]));
        assert!(text.contains("Analyzed 0 test cases"));
        assert!(text.contains("Time:   n/a vs n/a"));
        assert!(text.contains("Tools: n/a time, n/a length"));
    }

    #[test]
    fn test_json_summary_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let records = vec![BenchmarkRecord::new("q", "a", "x", "y").with_durations(1, 2)];
        let report = ComparisonReport::from_records(&records);

        let summary = JsonSummary::new("bench.jsonl", &[dir.path().join("time.svg")], &report);
        summary.write_to_file(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["source_file"], "bench.jsonl");
        assert_eq!(value["charts"][0], "time.svg");
        assert_eq!(value["report"]["total_records"], 1);
        assert!(value["report"]["correctness"].is_null());
    }
}
