// Exhaustive pairing search for qPCR condition groups
//
// Given a reference (control) group and condition groups of the same size n,
// every one of the n! sample-to-reference pairings is scored by the sample
// standard deviation of 2^(-diff) * 100 and ranked from lowest to highest.
//
// Pipeline per condition group:
//   PermutationEnumerator -> CandidateEvaluator -> ranking -> top-K
//
// The search is exact (no heuristics) and deterministic: enumeration is
// lexicographic, and equal standard deviations keep enumeration order. The
// optional worker partition splits the enumeration range and merges by the
// same key, so its output is identical to the sequential search.

mod config;
mod evaluator;
mod fingerprint;
mod permutation;
mod ranking;
mod service;

pub use config::{FailurePolicy, OptimizeConfig, MAX_PRECISION, MAX_WORKERS};
pub use evaluator::{relative_value, Candidate, CandidateEvaluator, MappingPair, ScoredPermutation};
pub use permutation::{
    factorial, permutation_count, unrank, Permutation, PermutationEnumerator, HARD_MAX_N,
};
pub use ranking::{merge_ranked, rank_candidates, rank_order, sort_ranked, top_k, RankKey};
pub use service::{
    optimize, ConditionResult, GroupInput, OptimizationRequest, OptimizationResult,
    OptimizeErrorRecord, SkippedCondition,
};
