//! Aggregate statistics over benchmark records

pub mod comparator;
pub mod metrics;

pub use comparator::{ComparisonReport, ConditionPair, CorrectnessSummary};
pub use metrics::{
    accuracy, has_correctness_data, length_by_correctness, length_series, mean, mean_length,
    mean_time, percent_delta, time_series, CorrectnessSplit,
};
