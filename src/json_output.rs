//! JSON output format for ranked pairings
//!
//! Machine-readable export: settings echo, per-condition candidates with
//! full-precision values, skipped groups and the result fingerprint.

use serde::{Deserialize, Serialize};

use crate::optimize::{
    Candidate, FailurePolicy, OptimizationResult, OptimizeConfig, SkippedCondition,
};

/// Settings that shaped the result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSettings {
    /// Candidates reported per condition (`None` = all)
    pub top_k: Option<usize>,
    /// Ceiling on group size (`None` = hard limit only)
    pub max_n: Option<usize>,
    pub failure_policy: FailurePolicy,
}

/// One ranked pairing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonCandidate {
    pub rank: usize,
    /// Human-readable mapping (`X→A, Y→B`)
    pub mapping: String,
    /// Reference index per sample index
    pub permutation: Vec<usize>,
    pub mean: f64,
    pub sd: f64,
    pub diffs: Vec<f64>,
    pub transformed: Vec<f64>,
}

impl From<&Candidate> for JsonCandidate {
    fn from(candidate: &Candidate) -> Self {
        Self {
            rank: candidate.rank,
            mapping: candidate.mapping_text(),
            permutation: candidate.permutation.clone(),
            mean: candidate.mean,
            sd: candidate.sd,
            diffs: candidate.diffs.clone(),
            transformed: candidate.transformed.clone(),
        }
    }
}

/// Ranked pairings for one condition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonCondition {
    pub name: String,
    /// Group size
    pub n: usize,
    /// Permutations ranked (n!)
    pub total_candidates: u64,
    pub candidates: Vec<JsonCandidate>,
}

/// A condition left out of the result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSkipped {
    pub name: String,
    pub kind: String,
    pub message: String,
}

impl From<&SkippedCondition> for JsonSkipped {
    fn from(skipped: &SkippedCondition) -> Self {
        Self {
            name: skipped.condition_name.clone(),
            kind: skipped.error.kind.clone(),
            message: skipped.error.message.clone(),
        }
    }
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Tool version
    pub version: String,
    /// Format name
    pub format: String,
    pub settings: JsonSettings,
    pub conditions: Vec<JsonCondition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<JsonSkipped>,
    /// SHA-256 over the exact result values
    pub fingerprint: String,
}

impl JsonOutput {
    /// Build the JSON document for a result
    pub fn new(result: &OptimizationResult, config: &OptimizeConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "qpcr-optimizer-json-v1".to_string(),
            settings: JsonSettings {
                top_k: config.top_k,
                max_n: config.max_n,
                failure_policy: config.failure_policy,
            },
            conditions: result
                .conditions
                .iter()
                .map(|condition| JsonCondition {
                    name: condition.condition_name.clone(),
                    n: condition.n,
                    total_candidates: condition.total_candidates,
                    candidates: condition.candidates.iter().map(JsonCandidate::from).collect(),
                })
                .collect(),
            skipped: result.skipped.iter().map(JsonSkipped::from).collect(),
            fingerprint: result.fingerprint(),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
