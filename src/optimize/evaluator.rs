// Candidate scoring
//
// For a permutation P pairing sample i with reference P[i]:
//   diff_i        = S[i] - R[P[i]]
//   transformed_i = 2^(-diff_i) * 100
// then the arithmetic mean and the Bessel-corrected standard deviation of the
// transformed values. `score` and `evaluate` share `summarize`, so the mean
// and sd of a materialized candidate are bit-identical to the ranked score.

use serde::{Deserialize, Serialize};

use crate::error::{OptimizeError, Result};
use crate::labeled::LabeledVector;

/// Relative value of a single paired difference: `2^(-diff) * 100`
#[inline]
pub fn relative_value(diff: f64) -> f64 {
    (-diff).exp2() * 100.0
}

/// Mean and sample standard deviation (divisor n - 1)
///
/// Callers guarantee at least two values.
fn summarize(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let squared: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    (mean, (squared / (n - 1.0)).sqrt())
}

/// One sample label paired with the reference label it is mapped onto
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingPair {
    pub sample: String,
    pub reference: String,
}

/// Mean/sd of one permutation, without the per-pair detail
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredPermutation {
    pub enumeration_index: u64,
    pub mean: f64,
    pub sd: f64,
}

/// A fully evaluated permutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// 1-based rank, assigned after sorting (0 until ranked)
    pub rank: usize,
    /// Lexicographic position of the permutation, the tie-break key
    pub enumeration_index: u64,
    pub permutation: Vec<usize>,
    pub mapping: Vec<MappingPair>,
    pub diffs: Vec<f64>,
    pub transformed: Vec<f64>,
    pub mean: f64,
    pub sd: f64,
}

impl Candidate {
    /// Mapping rendered as `X→A, Y→B`
    pub fn mapping_text(&self) -> String {
        self.mapping
            .iter()
            .map(|pair| format!("{}→{}", pair.sample, pair.reference))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Scores permutations of one condition group against the reference
#[derive(Debug)]
pub struct CandidateEvaluator<'a> {
    reference: &'a LabeledVector,
    sample: &'a LabeledVector,
    scratch: Vec<f64>,
}

impl<'a> CandidateEvaluator<'a> {
    /// Pair a condition group with the reference
    ///
    /// Fails on a length mismatch, and on n = 1 where the sample standard
    /// deviation is undefined.
    pub fn new(reference: &'a LabeledVector, sample: &'a LabeledVector) -> Result<Self> {
        if sample.len() != reference.len() {
            return Err(OptimizeError::DimensionMismatch {
                condition: sample.name().to_string(),
                expected: reference.len(),
                actual: sample.len(),
            });
        }

        if reference.len() < 2 {
            return Err(OptimizeError::DegenerateInput(sample.name().to_string()));
        }

        Ok(Self {
            reference,
            sample,
            scratch: vec![0.0; reference.len()],
        })
    }

    /// Group size n
    pub fn len(&self) -> usize {
        self.reference.len()
    }

    /// Always false: construction requires n >= 2
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Mean and sd for one permutation, reusing the internal scratch buffer
    pub fn score(&mut self, perm: &[usize], enumeration_index: u64) -> Result<ScoredPermutation> {
        let reference = self.reference.values();
        let mut diffs_finite = true;
        for ((slot, &sample), &r) in self
            .scratch
            .iter_mut()
            .zip(self.sample.values())
            .zip(perm)
        {
            let diff = sample - reference[r];
            diffs_finite &= diff.is_finite();
            *slot = relative_value(diff);
        }

        let (mean, sd) = summarize(&self.scratch);
        self.check_finite(diffs_finite, mean, sd, enumeration_index)?;

        Ok(ScoredPermutation {
            enumeration_index,
            mean,
            sd,
        })
    }

    /// Full evaluation: diffs, transformed values, mapping descriptor
    pub fn evaluate(&self, perm: &[usize], enumeration_index: u64) -> Result<Candidate> {
        let reference = self.reference.values();
        let diffs: Vec<f64> = self
            .sample
            .values()
            .iter()
            .zip(perm)
            .map(|(&sample, &r)| sample - reference[r])
            .collect();
        let transformed: Vec<f64> = diffs.iter().map(|&d| relative_value(d)).collect();

        let (mean, sd) = summarize(&transformed);
        let diffs_finite = diffs.iter().all(|d| d.is_finite());
        self.check_finite(diffs_finite, mean, sd, enumeration_index)?;

        let reference_labels = self.reference.labels();
        let mapping = self
            .sample
            .labels()
            .iter()
            .zip(perm)
            .map(|(sample, &r)| MappingPair {
                sample: sample.clone(),
                reference: reference_labels[r].clone(),
            })
            .collect();

        Ok(Candidate {
            rank: 0,
            enumeration_index,
            permutation: perm.to_vec(),
            mapping,
            diffs,
            transformed,
            mean,
            sd,
        })
    }

    /// A diff overflowing to infinity maps to a finite 0 or infinite
    /// transform, so the diffs are checked alongside the statistics
    fn check_finite(
        &self,
        diffs_finite: bool,
        mean: f64,
        sd: f64,
        enumeration_index: u64,
    ) -> Result<()> {
        if diffs_finite && mean.is_finite() && sd.is_finite() {
            Ok(())
        } else {
            Err(OptimizeError::NonFiniteResult {
                condition: self.sample.name().to_string(),
                enumeration_index,
            })
        }
    }
}
