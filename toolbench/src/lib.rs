//! Tool-use benchmark analysis
//!
//! This crate works on line-delimited JSON files produced by a benchmark run
//! that answers each prompt twice, once with tools and once without. It
//! provides two pipelines that share the record format:
//!
//! - **Scoring**: an interactive, resumable session in which a human marks
//!   each response correct or incorrect, saving progress periodically.
//! - **Analysis**: mean time and length per condition, percentage savings,
//!   accuracy and length-by-correctness, printed and rendered as SVG charts.
//!
//! # Example
//!
//! ```no_run
//! use toolbench::{
//!     analysis::ComparisonReport,
//!     config::Config,
//!     records::load_records,
//!     reporting::{print_console_report, ChartEmitter},
//! };
//!
//! let config = Config::load_or_default();
//! let records = load_records("results/benchmark.jsonl").unwrap();
//! let report = ComparisonReport::from_records(&records);
//!
//! ChartEmitter::new(config.charts)
//!     .emit(&records, &report, "output")
//!     .unwrap();
//! print_console_report(&report);
//! ```

pub mod analysis;
pub mod config;
pub mod records;
pub mod reporting;
pub mod scoring;

pub use config::Config;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::analysis::{
        accuracy, has_correctness_data, length_by_correctness, mean_length, mean_time,
        percent_delta, ComparisonReport, ConditionPair, CorrectnessSplit,
    };
    pub use crate::config::{ChartConfig, Config, ScoringConfig};
    pub use crate::records::{
        load_records, save_records, BenchmarkRecord, Condition, JudgeState, LoadError, Verdict,
    };
    pub use crate::reporting::{print_console_report, ChartEmitter, ChartView, JsonSummary};
    pub use crate::scoring::{listen_for_interrupt, Console, ScoreError, Scorer, TerminalConsole};
}
