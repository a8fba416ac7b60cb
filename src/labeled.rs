//! Labeled measurement vectors
//!
//! A [`LabeledVector`] pairs each measurement with its well/sample label.
//! Construction validates the pairing once; afterwards the vector is read-only.

use serde::{Deserialize, Serialize};

use crate::error::{OptimizeError, Result};

/// Name used in errors for the reference (control) vector
pub const REFERENCE_NAME: &str = "reference";

/// Ordered (label, value) measurements belonging to one named group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledVector {
    name: String,
    labels: Vec<String>,
    values: Vec<f64>,
}

impl LabeledVector {
    /// Build a vector, rejecting a label/value count mismatch
    ///
    /// # Example
    /// ```
    /// use qpcr_optimizer::labeled::LabeledVector;
    ///
    /// let v = LabeledVector::new("reference", vec!["A".into(), "B".into()], vec![1.0, 0.9]).unwrap();
    /// assert_eq!(v.len(), 2);
    /// ```
    pub fn new(name: impl Into<String>, labels: Vec<String>, values: Vec<f64>) -> Result<Self> {
        let name = name.into();
        if labels.len() != values.len() {
            return Err(OptimizeError::LabelValueMismatch {
                vector: name,
                labels: labels.len(),
                values: values.len(),
            });
        }

        Ok(Self {
            name,
            labels,
            values,
        })
    }

    /// Build the reference vector
    pub fn reference(labels: Vec<String>, values: Vec<f64>) -> Result<Self> {
        Self::new(REFERENCE_NAME, labels, values)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Reject NaN and infinite measurements
    pub(crate) fn ensure_finite(&self) -> Result<()> {
        match self.values.iter().position(|v| !v.is_finite()) {
            Some(idx) => Err(OptimizeError::InvalidInput(format!(
                "'{}' value #{} ({}) is not finite",
                self.name,
                idx + 1,
                self.values[idx]
            ))),
            None => Ok(()),
        }
    }
}
