//! Error taxonomy for the optimization core
//!
//! Every failure names the vector or condition group it came from so the
//! caller can report it without re-deriving context.

use thiserror::Error;

/// Errors raised while validating inputs or searching the permutation space
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimizeError {
    /// Structurally invalid input (empty reference, ceiling exceeded, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A condition group does not have as many samples as the reference
    #[error("Condition '{condition}' has {actual} samples, reference has {expected}")]
    DimensionMismatch {
        condition: String,
        expected: usize,
        actual: usize,
    },

    /// Label count differs from value count for the same vector
    #[error("'{vector}' has {labels} labels but {values} values")]
    LabelValueMismatch {
        vector: String,
        labels: usize,
        values: usize,
    },

    /// n = 1: the sample standard deviation divides by n - 1 = 0
    #[error("Condition '{0}' has a single sample; sample standard deviation is undefined")]
    DegenerateInput(String),

    /// 2^(-diff) overflowed while scoring a permutation
    #[error(
        "Condition '{condition}' produced a non-finite statistic at permutation #{enumeration_index}"
    )]
    NonFiniteResult {
        condition: String,
        enumeration_index: u64,
    },
}

/// Result type for optimization operations
pub type Result<T> = std::result::Result<T, OptimizeError>;
