// Orchestration: validate -> enumerate -> score -> rank -> materialize
//
// Every permutation of a condition group is scored into a compact
// `ScoredPermutation` and ranked. Full candidates (mapping, diffs, transformed
// values) are rebuilt by unranking only for the retained top-K, so memory
// stays proportional to n! small records rather than n! full candidates.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::config::{FailurePolicy, OptimizeConfig};
use super::evaluator::{Candidate, CandidateEvaluator, ScoredPermutation};
use super::permutation::{permutation_count, unrank, PermutationEnumerator};
use super::ranking::{merge_ranked, sort_ranked, top_k};
use crate::error::{OptimizeError, Result};
use crate::labeled::{LabeledVector, REFERENCE_NAME};

/// Raw (unvalidated) labels and values for one named group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupInput {
    pub name: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl GroupInput {
    pub fn new(name: impl Into<String>, labels: Vec<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            labels,
            values,
        }
    }

    fn into_vector(self) -> Result<LabeledVector> {
        LabeledVector::new(self.name, self.labels, self.values)
    }
}

/// Immutable input to one optimization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub reference: GroupInput,
    /// Condition groups in reporting order
    pub conditions: Vec<GroupInput>,
}

impl OptimizationRequest {
    pub fn new(
        reference_labels: Vec<String>,
        reference_values: Vec<f64>,
        conditions: Vec<GroupInput>,
    ) -> Self {
        Self {
            reference: GroupInput::new(REFERENCE_NAME, reference_labels, reference_values),
            conditions,
        }
    }
}

/// Ranked candidates for one condition group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionResult {
    pub condition_name: String,
    /// Group size
    pub n: usize,
    /// Permutations ranked (n!)
    pub total_candidates: u64,
    /// Best first, possibly truncated to top-K
    pub candidates: Vec<Candidate>,
}

impl ConditionResult {
    /// Lowest-sd candidate
    pub fn best(&self) -> Option<&Candidate> {
        self.candidates.first()
    }
}

/// A condition group left out under [`FailurePolicy::SkipGroup`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedCondition {
    pub condition_name: String,
    pub error: OptimizeErrorRecord,
}

/// Serializable snapshot of the error that caused a skip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeErrorRecord {
    pub kind: String,
    pub message: String,
}

impl From<&OptimizeError> for OptimizeErrorRecord {
    fn from(err: &OptimizeError) -> Self {
        let kind = match err {
            OptimizeError::InvalidInput(_) => "invalid_input",
            OptimizeError::DimensionMismatch { .. } => "dimension_mismatch",
            OptimizeError::LabelValueMismatch { .. } => "label_value_mismatch",
            OptimizeError::DegenerateInput(_) => "degenerate_input",
            OptimizeError::NonFiniteResult { .. } => "non_finite_result",
        };
        Self {
            kind: kind.to_string(),
            message: err.to_string(),
        }
    }
}

/// Terminal artifact of an optimization run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// One entry per computed condition, in input order
    pub conditions: Vec<ConditionResult>,
    /// Groups skipped under [`FailurePolicy::SkipGroup`], in input order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedCondition>,
}

/// Find the lowest-variance pairing for every condition group
///
/// # Example
/// ```
/// use qpcr_optimizer::optimize::{optimize, GroupInput, OptimizationRequest, OptimizeConfig};
///
/// let request = OptimizationRequest::new(
///     vec!["A".into(), "B".into()],
///     vec![1.0, 0.9],
///     vec![GroupInput::new("C1", vec!["X".into(), "Y".into()], vec![1.2, 0.8])],
/// );
/// let result = optimize(&request, &OptimizeConfig::default()).unwrap();
/// let best = result.conditions[0].best().unwrap();
/// assert_eq!(best.permutation, vec![0, 1]);
/// assert_eq!(best.rank, 1);
/// ```
pub fn optimize(
    request: &OptimizationRequest,
    config: &OptimizeConfig,
) -> Result<OptimizationResult> {
    config.validate().map_err(OptimizeError::InvalidInput)?;

    let reference = validate_reference(request.reference.clone(), config)?;
    tracing::debug!(
        n = reference.len(),
        conditions = request.conditions.len(),
        policy = ?config.failure_policy,
        "validated reference"
    );

    match config.failure_policy {
        FailurePolicy::AbortAll => optimize_abort_all(&reference, &request.conditions, config),
        FailurePolicy::SkipGroup => Ok(optimize_skip_group(
            &reference,
            &request.conditions,
            config,
        )),
    }
}

/// Validate everything first so no partial result is ever produced
fn optimize_abort_all(
    reference: &LabeledVector,
    conditions: &[GroupInput],
    config: &OptimizeConfig,
) -> Result<OptimizationResult> {
    let mut seen = HashSet::new();
    let validated = conditions
        .iter()
        .map(|group| validate_condition(reference, group.clone(), &mut seen))
        .collect::<Result<Vec<_>>>()?;

    let conditions = validated
        .iter()
        .map(|condition| rank_condition(reference, condition, config))
        .collect::<Result<Vec<_>>>()?;

    Ok(OptimizationResult {
        conditions,
        skipped: Vec::new(),
    })
}

fn optimize_skip_group(
    reference: &LabeledVector,
    conditions: &[GroupInput],
    config: &OptimizeConfig,
) -> OptimizationResult {
    let mut seen = HashSet::new();
    let mut result = OptimizationResult::default();

    for group in conditions {
        let outcome = validate_condition(reference, group.clone(), &mut seen)
            .and_then(|condition| rank_condition(reference, &condition, config));

        match outcome {
            Ok(ranked) => result.conditions.push(ranked),
            Err(err) => {
                tracing::warn!("Skipping condition '{}': {}", group.name, err);
                result.skipped.push(SkippedCondition {
                    condition_name: group.name.clone(),
                    error: OptimizeErrorRecord::from(&err),
                });
            }
        }
    }

    result
}

fn validate_reference(input: GroupInput, config: &OptimizeConfig) -> Result<LabeledVector> {
    let reference = input.into_vector()?;

    if reference.is_empty() {
        return Err(OptimizeError::InvalidInput(
            "reference vector is empty".to_string(),
        ));
    }

    let max_n = config.effective_max_n();
    if reference.len() > max_n {
        return Err(OptimizeError::InvalidInput(format!(
            "reference has {} samples, above the ceiling of {} ({} permutations per condition)",
            reference.len(),
            max_n,
            permutation_count(reference.len())
                .map(|count| count.to_string())
                .unwrap_or_else(|_| "too many".to_string())
        )));
    }

    reference.ensure_finite()?;
    Ok(reference)
}

fn validate_condition(
    reference: &LabeledVector,
    input: GroupInput,
    seen: &mut HashSet<String>,
) -> Result<LabeledVector> {
    if !seen.insert(input.name.clone()) {
        return Err(OptimizeError::InvalidInput(format!(
            "duplicate condition name '{}'",
            input.name
        )));
    }

    let condition = input.into_vector()?;

    if condition.len() != reference.len() {
        return Err(OptimizeError::DimensionMismatch {
            condition: condition.name().to_string(),
            expected: reference.len(),
            actual: condition.len(),
        });
    }

    condition.ensure_finite()?;

    if reference.len() == 1 {
        return Err(OptimizeError::DegenerateInput(condition.name().to_string()));
    }

    Ok(condition)
}

/// Score, rank and materialize one condition group
fn rank_condition(
    reference: &LabeledVector,
    condition: &LabeledVector,
    config: &OptimizeConfig,
) -> Result<ConditionResult> {
    let n = reference.len();
    let total = permutation_count(n)?;

    let scores = if config.workers > 1 && total > 1 {
        score_partitioned(reference, condition, total, config.workers)?
    } else {
        score_range(reference, condition, 0, total)?
    };

    let retained = top_k(scores, config.top_k);
    let evaluator = CandidateEvaluator::new(reference, condition)?;
    let candidates = retained
        .iter()
        .enumerate()
        .map(|(position, scored)| {
            let perm = unrank(n, scored.enumeration_index)?;
            let mut candidate = evaluator.evaluate(&perm, scored.enumeration_index)?;
            candidate.rank = position + 1;
            Ok(candidate)
        })
        .collect::<Result<Vec<_>>>()?;

    if let Some(best) = candidates.first() {
        tracing::info!(
            condition = condition.name(),
            n,
            ranked = total,
            best_sd = best.sd,
            best_mean = best.mean,
            "ranked condition"
        );
    }

    Ok(ConditionResult {
        condition_name: condition.name().to_string(),
        n,
        total_candidates: total,
        candidates,
    })
}

/// Score enumeration indices `[start, end)` and rank them locally
fn score_range(
    reference: &LabeledVector,
    condition: &LabeledVector,
    start: u64,
    end: u64,
) -> Result<Vec<ScoredPermutation>> {
    let mut evaluator = CandidateEvaluator::new(reference, condition)?;
    let mut enumerator = PermutationEnumerator::range(reference.len(), start, end)?;

    let capacity = usize::try_from(end - start).unwrap_or(0);
    let mut scores = Vec::with_capacity(capacity);
    while let Some((index, perm)) = enumerator.next_permutation() {
        scores.push(evaluator.score(perm, index)?);
    }

    sort_ranked(&mut scores);
    Ok(scores)
}

/// Split the enumeration range into contiguous chunks on scoped threads
fn score_partitioned(
    reference: &LabeledVector,
    condition: &LabeledVector,
    total: u64,
    workers: usize,
) -> Result<Vec<ScoredPermutation>> {
    // Never more partitions than permutations
    let partitions = (workers as u64).min(total);
    let chunk = total.div_ceil(partitions);
    let ranges: Vec<(u64, u64)> = (0..partitions)
        .map(|w| (w * chunk, ((w + 1) * chunk).min(total)))
        .filter(|(start, end)| start < end)
        .collect();

    tracing::debug!(
        condition = condition.name(),
        workers = ranges.len(),
        chunk,
        "partitioned permutation space"
    );

    let parts = crossbeam::thread::scope(|scope| {
        let handles: Vec<_> = ranges
            .iter()
            .map(|&(start, end)| {
                scope.spawn(move |_| score_range(reference, condition, start, end))
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect::<Vec<_>>()
    })
    .unwrap_or_else(|panic| std::panic::resume_unwind(panic));

    let parts = parts.into_iter().collect::<Result<Vec<_>>>()?;
    Ok(merge_ranked(parts))
}
