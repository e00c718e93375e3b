//! Benchmark record definitions and loading

pub mod loader;

pub use loader::{
    correctness_path, load_records, parse_records, save_records, scored_path, LoadError,
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Response-generation mode being compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    WithTools,
    WithoutTools,
}

impl Condition {
    pub fn all() -> [Condition; 2] {
        [Condition::WithTools, Condition::WithoutTools]
    }

    /// Field prefix used in the record format
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::WithTools => "with_tools",
            Condition::WithoutTools => "without_tools",
        }
    }

    /// Human-readable label for reports and chart axes
    pub fn label(&self) -> &'static str {
        match self {
            Condition::WithTools => "With Tools",
            Condition::WithoutTools => "Without Tools",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Human correctness label for one condition on one record.
///
/// Serialized as `null`, `true` or `false`; an absent key reads as `Unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Verdict {
    #[default]
    Unset,
    Correct,
    Incorrect,
}

impl Verdict {
    pub fn is_set(&self) -> bool {
        !matches!(self, Verdict::Unset)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Verdict::Unset => None,
            Verdict::Correct => Some(true),
            Verdict::Incorrect => Some(false),
        }
    }
}

impl From<bool> for Verdict {
    fn from(correct: bool) -> Self {
        if correct {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        }
    }
}

impl From<Option<bool>> for Verdict {
    fn from(value: Option<bool>) -> Self {
        value.map(Verdict::from).unwrap_or(Verdict::Unset)
    }
}

impl From<Verdict> for Option<bool> {
    fn from(verdict: Verdict) -> Self {
        verdict.as_bool()
    }
}

/// Where a record stands in the interactive judging flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgeState {
    Unjudged,
    WithToolsJudged,
    FullyJudged,
}

/// Key order of the line a record was read from.
///
/// Saves write keys in this order so untouched records come back byte for
/// byte. It never takes part in record equality.
#[derive(Debug, Clone, Default)]
pub struct KeyOrder(Vec<String>);

impl KeyOrder {
    pub fn new(keys: Vec<String>) -> Self {
        Self(keys)
    }

    pub fn keys(&self) -> &[String] {
        &self.0
    }
}

impl PartialEq for KeyOrder {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

/// One evaluated prompt with both responses and their measurements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub prompt: String,
    pub expected_output: String,
    pub with_tools: String,
    pub without_tools: String,
    pub with_tools_duration_ms: u64,
    pub without_tools_duration_ms: u64,
    pub with_tools_length: u64,
    pub without_tools_length: u64,
    /// Keys written upstream that this tool does not interpret (e.g. `timestamp`)
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub with_tools_correct: Verdict,
    #[serde(default)]
    pub without_tools_correct: Verdict,
    #[serde(skip)]
    pub key_order: KeyOrder,
}

impl BenchmarkRecord {
    /// Create an unjudged record, deriving lengths from the response texts
    pub fn new(
        prompt: impl Into<String>,
        expected_output: impl Into<String>,
        with_tools: impl Into<String>,
        without_tools: impl Into<String>,
    ) -> Self {
        let with_tools = with_tools.into();
        let without_tools = without_tools.into();
        Self {
            prompt: prompt.into(),
            expected_output: expected_output.into(),
            with_tools_length: with_tools.chars().count() as u64,
            without_tools_length: without_tools.chars().count() as u64,
            with_tools,
            without_tools,
            with_tools_duration_ms: 0,
            without_tools_duration_ms: 0,
            extra: IndexMap::new(),
            with_tools_correct: Verdict::Unset,
            without_tools_correct: Verdict::Unset,
            key_order: KeyOrder::default(),
        }
    }

    pub fn with_durations(mut self, with_tools_ms: u64, without_tools_ms: u64) -> Self {
        self.with_tools_duration_ms = with_tools_ms;
        self.without_tools_duration_ms = without_tools_ms;
        self
    }

    pub fn with_verdicts(mut self, with_tools: Verdict, without_tools: Verdict) -> Self {
        self.with_tools_correct = with_tools;
        self.without_tools_correct = without_tools;
        self
    }

    pub fn response(&self, condition: Condition) -> &str {
        match condition {
            Condition::WithTools => &self.with_tools,
            Condition::WithoutTools => &self.without_tools,
        }
    }

    pub fn duration_ms(&self, condition: Condition) -> u64 {
        match condition {
            Condition::WithTools => self.with_tools_duration_ms,
            Condition::WithoutTools => self.without_tools_duration_ms,
        }
    }

    pub fn length(&self, condition: Condition) -> u64 {
        match condition {
            Condition::WithTools => self.with_tools_length,
            Condition::WithoutTools => self.without_tools_length,
        }
    }

    pub fn verdict(&self, condition: Condition) -> Verdict {
        match condition {
            Condition::WithTools => self.with_tools_correct,
            Condition::WithoutTools => self.without_tools_correct,
        }
    }

    pub fn set_verdict(&mut self, condition: Condition, verdict: Verdict) {
        match condition {
            Condition::WithTools => self.with_tools_correct = verdict,
            Condition::WithoutTools => self.without_tools_correct = verdict,
        }
    }

    /// A record counts as started once its with-tools response is judged.
    /// A lone without-tools verdict does not move the record forward.
    pub fn judge_state(&self) -> JudgeState {
        match (self.with_tools_correct.is_set(), self.without_tools_correct.is_set()) {
            (false, _) => JudgeState::Unjudged,
            (true, false) => JudgeState::WithToolsJudged,
            (true, true) => JudgeState::FullyJudged,
        }
    }
}
