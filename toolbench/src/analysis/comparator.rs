//! With-tools vs without-tools comparison over a whole run

use serde::{Deserialize, Serialize};

use super::metrics::{self, CorrectnessSplit};
use crate::records::{BenchmarkRecord, Condition};

/// A value measured under both conditions
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConditionPair {
    pub with_tools: Option<f64>,
    pub without_tools: Option<f64>,
}

impl ConditionPair {
    pub fn measure(f: impl Fn(Condition) -> Option<f64>) -> Self {
        Self {
            with_tools: f(Condition::WithTools),
            without_tools: f(Condition::WithoutTools),
        }
    }

    pub fn get(&self, condition: Condition) -> Option<f64> {
        match condition {
            Condition::WithTools => self.with_tools,
            Condition::WithoutTools => self.without_tools,
        }
    }

    /// Savings of the with-tools value relative to the without-tools baseline
    pub fn delta_pct(&self) -> Option<f64> {
        metrics::percent_delta(self.with_tools?, self.without_tools?)
    }
}

/// Correctness-derived figures, only present once some record has been judged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectnessSummary {
    pub accuracy_pct: ConditionPair,
    pub with_tools_length: CorrectnessSplit,
    pub without_tools_length: CorrectnessSplit,
}

impl CorrectnessSummary {
    pub fn length_split(&self, condition: Condition) -> &CorrectnessSplit {
        match condition {
            Condition::WithTools => &self.with_tools_length,
            Condition::WithoutTools => &self.without_tools_length,
        }
    }
}

/// Aggregated statistics for one benchmark file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub total_records: usize,
    pub mean_time_ms: ConditionPair,
    pub mean_length: ConditionPair,
    pub time_delta_pct: Option<f64>,
    pub length_delta_pct: Option<f64>,
    pub correctness: Option<CorrectnessSummary>,
}

impl ComparisonReport {
    /// Compute every summary figure from the loaded records
    pub fn from_records(records: &[BenchmarkRecord]) -> Self {
        let mean_time_ms = ConditionPair::measure(|c| metrics::mean_time(records, c));
        let mean_length = ConditionPair::measure(|c| metrics::mean_length(records, c));

        let time_delta_pct = mean_time_ms.delta_pct();
        let length_delta_pct = mean_length.delta_pct();
        if !records.is_empty() && time_delta_pct.is_none() {
            tracing::warn!("Without-tools mean time is zero; time delta is undefined");
        }
        if !records.is_empty() && length_delta_pct.is_none() {
            tracing::warn!("Without-tools mean length is zero; length delta is undefined");
        }

        let correctness = metrics::has_correctness_data(records).then(|| CorrectnessSummary {
            accuracy_pct: ConditionPair::measure(|c| metrics::accuracy(records, c)),
            with_tools_length: metrics::length_by_correctness(records, Condition::WithTools),
            without_tools_length: metrics::length_by_correctness(records, Condition::WithoutTools),
        });

        Self {
            total_records: records.len(),
            mean_time_ms,
            mean_length,
            time_delta_pct,
            length_delta_pct,
            correctness,
        }
    }

    pub fn has_correctness_data(&self) -> bool {
        self.correctness.is_some()
    }
}
