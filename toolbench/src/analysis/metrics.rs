//! Summary statistics over benchmark records
//!
//! Every mean or ratio returns `Option<f64>`; `None` means there was no data
//! to compute it from (empty input, empty partition, zero baseline).

use serde::{Deserialize, Serialize};

use crate::records::{BenchmarkRecord, Condition, Verdict};

/// Mean length split by the human verdict for one condition
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CorrectnessSplit {
    pub correct: Option<f64>,
    pub incorrect: Option<f64>,
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Per-record durations for a condition, in file order
pub fn time_series(records: &[BenchmarkRecord], condition: Condition) -> Vec<f64> {
    records
        .iter()
        .map(|r| r.duration_ms(condition) as f64)
        .collect()
}

/// Per-record response lengths for a condition, in file order
pub fn length_series(records: &[BenchmarkRecord], condition: Condition) -> Vec<f64> {
    records
        .iter()
        .map(|r| r.length(condition) as f64)
        .collect()
}

pub fn mean_time(records: &[BenchmarkRecord], condition: Condition) -> Option<f64> {
    mean(&time_series(records, condition))
}

pub fn mean_length(records: &[BenchmarkRecord], condition: Condition) -> Option<f64> {
    mean(&length_series(records, condition))
}

/// Savings of `a` relative to baseline `b`: `(b - a) / b * 100`.
///
/// Positive when `a` is smaller than the baseline. `None` for a zero baseline.
pub fn percent_delta(a: f64, b: f64) -> Option<f64> {
    if b == 0.0 {
        return None;
    }
    Some((b - a) / b * 100.0)
}

/// True when at least one record has a with-tools verdict
pub fn has_correctness_data(records: &[BenchmarkRecord]) -> bool {
    records.iter().any(|r| r.with_tools_correct.is_set())
}

/// Percentage of all records judged correct for a condition.
///
/// The denominator is the full record count, so unjudged records count as
/// not correct and partially-scored runs stay comparable.
pub fn accuracy(records: &[BenchmarkRecord], condition: Condition) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let correct = records
        .iter()
        .filter(|r| r.verdict(condition) == Verdict::Correct)
        .count();
    Some(correct as f64 / records.len() as f64 * 100.0)
}

/// Mean length of correct and incorrect responses; unjudged records are left out
pub fn length_by_correctness(records: &[BenchmarkRecord], condition: Condition) -> CorrectnessSplit {
    let lengths_for = |wanted: Verdict| -> Vec<f64> {
        records
            .iter()
            .filter(|r| r.verdict(condition) == wanted)
            .map(|r| r.length(condition) as f64)
            .collect()
    };

    CorrectnessSplit {
        correct: mean(&lengths_for(Verdict::Correct)),
        incorrect: mean(&lengths_for(Verdict::Incorrect)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(with_ms: u64, without_ms: u64) -> BenchmarkRecord {
        BenchmarkRecord::new("q", "a", "x", "y").with_durations(with_ms, without_ms)
    }

    #[test]
    fn test_mean_time_and_delta_sign() {
        let records = vec![record(50, 150), record(150, 250)];
        let with = mean_time(&records, Condition::WithTools).unwrap();
        let without = mean_time(&records, Condition::WithoutTools).unwrap();
        assert_eq!(with, 100.0);
        assert_eq!(without, 200.0);
        assert_eq!(percent_delta(with, without), Some(50.0));
        assert_eq!(percent_delta(without, with), Some(-100.0));
    }

    #[test]
    fn test_empty_input_has_no_means() {
        let records: Vec<BenchmarkRecord> = Vec::new();
        assert_eq!(mean_time(&records, Condition::WithTools), None);
        assert_eq!(mean_length(&records, Condition::WithoutTools), None);
        assert_eq!(accuracy(&records, Condition::WithTools), None);
        assert!(!has_correctness_data(&records));
    }

    #[test]
    fn test_zero_baseline() {
        assert_eq!(percent_delta(10.0, 0.0), None);
        assert_eq!(percent_delta(0.0, 10.0), Some(100.0));
    }

    #[test]
    fn test_accuracy_counts_unjudged_in_denominator() {
        let records = vec![
            record(1, 1).with_verdicts(Verdict::Correct, Verdict::Incorrect),
            record(1, 1).with_verdicts(Verdict::Correct, Verdict::Correct),
            record(1, 1),
            record(1, 1),
        ];
        assert_eq!(accuracy(&records, Condition::WithTools), Some(50.0));
        assert_eq!(accuracy(&records, Condition::WithoutTools), Some(25.0));
        assert!(has_correctness_data(&records));
    }

    #[test]
    fn test_length_by_correctness() {
        let records = vec![
            BenchmarkRecord::new("q", "a", "1234", "12").with_verdicts(Verdict::Correct, Verdict::Correct),
            BenchmarkRecord::new("q", "a", "12", "1234").with_verdicts(Verdict::Correct, Verdict::Unset),
            BenchmarkRecord::new("q", "a", "123456", "1").with_verdicts(Verdict::Incorrect, Verdict::Correct),
        ];

        let with = length_by_correctness(&records, Condition::WithTools);
        assert_eq!(with.correct, Some(3.0));
        assert_eq!(with.incorrect, Some(6.0));

        let without = length_by_correctness(&records, Condition::WithoutTools);
        assert_eq!(without.correct, Some(1.5));
        assert_eq!(without.incorrect, None);
    }
}
