//! Tabular rows shared by the CSV, HTML and text renderers
//!
//! One row per reported candidate:
//! `{condition, rank, mapping, mean, sd, transformed, diffs}` with the per-pair
//! values joined by `;` at the configured precision.

use serde::Serialize;

use crate::optimize::{Candidate, OptimizationResult};

/// Decimal places used when rendering per-pair values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision {
    pub diffs: usize,
    pub transformed: usize,
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            diffs: 4,
            transformed: 6,
        }
    }
}

impl From<&crate::optimize::OptimizeConfig> for Precision {
    fn from(config: &crate::optimize::OptimizeConfig) -> Self {
        Self {
            diffs: config.diffs_precision,
            transformed: config.transformed_precision,
        }
    }
}

/// One reported candidate, ready for a tabular sink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub condition: String,
    pub rank: usize,
    pub mapping: String,
    pub mean: f64,
    pub sd: f64,
    pub transformed: String,
    pub diffs: String,
}

impl ReportRow {
    pub fn from_candidate(condition: &str, candidate: &Candidate, precision: Precision) -> Self {
        Self {
            condition: condition.to_string(),
            rank: candidate.rank,
            mapping: candidate.mapping_text(),
            mean: candidate.mean,
            sd: candidate.sd,
            transformed: join_fixed(&candidate.transformed, precision.transformed),
            diffs: join_fixed(&candidate.diffs, precision.diffs),
        }
    }
}

/// Flatten a result into rows, condition by condition, best first
pub fn report_rows(result: &OptimizationResult, precision: Precision) -> Vec<ReportRow> {
    result
        .conditions
        .iter()
        .flat_map(|condition| {
            condition.candidates.iter().map(move |candidate| {
                ReportRow::from_candidate(&condition.condition_name, candidate, precision)
            })
        })
        .collect()
}

/// Join values with `;` at a fixed number of decimal places
pub fn join_fixed(values: &[f64], decimals: usize) -> String {
    values
        .iter()
        .map(|v| format!("{:.*}", decimals, v))
        .collect::<Vec<_>>()
        .join(";")
}
