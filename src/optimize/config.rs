// Configuration for the permutation search
//
// Output precision and the number of reported ranks are parameters of one
// search rather than separate entry points.

use serde::{Deserialize, Serialize};

use super::permutation::HARD_MAX_N;

/// Most decimal places that still carry information in an f64
pub const MAX_PRECISION: usize = 17;

/// Upper bound on worker threads per condition
pub const MAX_WORKERS: usize = 256;

/// What to do when a condition group fails validation or scoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// First invalid group fails the whole batch (no partial results)
    #[default]
    AbortAll,
    /// Record the invalid group as skipped and continue with the next one
    SkipGroup,
}

/// Configuration for [`optimize`](super::optimize)
///
/// # Example
/// ```
/// use qpcr_optimizer::optimize::OptimizeConfig;
///
/// let config = OptimizeConfig::default();
/// assert_eq!(config.top_k, Some(10));
/// assert_eq!(config.max_n, Some(10));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeConfig {
    /// Number of best candidates retained per condition
    ///
    /// The engine always ranks all n! permutations; this only bounds how many
    /// are materialized and reported. `None` retains every permutation.
    ///
    /// Default: 10
    pub top_k: Option<usize>,

    /// Safety ceiling on the group size n
    ///
    /// Work grows as n!: n = 10 is 3,628,800 candidates per condition.
    /// `None` leaves only the hard limit of 20 (largest n! that fits a u64).
    ///
    /// Default: 10
    pub max_n: Option<usize>,

    /// Decimal places for diffs in exported rows (presentation only)
    ///
    /// Default: 4
    pub diffs_precision: usize,

    /// Decimal places for transformed values in exported rows (presentation only)
    ///
    /// Default: 6
    pub transformed_precision: usize,

    /// Behavior on an invalid condition group
    ///
    /// Default: abort the whole batch
    pub failure_policy: FailurePolicy,

    /// Worker threads per condition; 1 runs the search on the calling thread
    ///
    /// Results are identical for every worker count.
    ///
    /// Default: 1
    pub workers: usize,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            top_k: Some(10),
            max_n: Some(10),
            diffs_precision: 4,
            transformed_precision: 6,
            failure_policy: FailurePolicy::AbortAll,
            workers: 1,
        }
    }
}

impl OptimizeConfig {
    /// Report every permutation instead of the top 10
    pub fn exhaustive() -> Self {
        Self {
            top_k: None,
            ..Self::default()
        }
    }

    /// Skip invalid condition groups instead of aborting the batch
    pub fn lenient() -> Self {
        Self {
            failure_policy: FailurePolicy::SkipGroup,
            ..Self::default()
        }
    }

    /// Effective ceiling on n
    pub fn effective_max_n(&self) -> usize {
        self.max_n.unwrap_or(HARD_MAX_N)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.top_k == Some(0) {
            return Err("top_k must be >= 1 (omit it to keep every candidate)".to_string());
        }

        if let Some(max_n) = self.max_n {
            if !(1..=HARD_MAX_N).contains(&max_n) {
                return Err(format!(
                    "max_n must be in [1, {}], got {}",
                    HARD_MAX_N, max_n
                ));
            }
        }

        if self.diffs_precision > MAX_PRECISION {
            return Err(format!(
                "diffs_precision must be <= {}, got {}",
                MAX_PRECISION, self.diffs_precision
            ));
        }

        if self.transformed_precision > MAX_PRECISION {
            return Err(format!(
                "transformed_precision must be <= {}, got {}",
                MAX_PRECISION, self.transformed_precision
            ));
        }

        if !(1..=MAX_WORKERS).contains(&self.workers) {
            return Err(format!(
                "workers must be in [1, {}], got {}",
                MAX_WORKERS, self.workers
            ));
        }

        Ok(())
    }
}
