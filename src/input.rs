//! Input collection: delimited text, TOML input files and inline groups
//!
//! Everything here runs before the optimization core. Malformed numbers,
//! missing groups and oversized batches are reported with their position so
//! the core only ever sees well-formed requests.
//!
//! # Input file format
//!
//! ```toml
//! [reference]
//! labels = "A, B, C, D"
//! values = "1.0, 0.9, 1.1, 1.0"
//!
//! [[condition]]
//! name = "Cond1"
//! labels = "Cond1_A, Cond1_B, Cond1_C, Cond1_D"
//! values = "1.2, 0.8, 1.0, 1.1"
//!
//! [settings]
//! top_k = 10
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::optimize::{GroupInput, OptimizationRequest, OptimizeConfig};

/// Default ceiling on the number of condition groups per run
pub const DEFAULT_MAX_CONDITIONS: usize = 10;

/// Errors raised while collecting input
#[derive(Error, Debug)]
pub enum InputError {
    #[error("{group}: value #{position} '{token}' is not a decimal number")]
    MalformedValue {
        group: String,
        position: usize,
        token: String,
    },

    #[error("{group}: value #{position} '{token}' is not finite")]
    NonFiniteValue {
        group: String,
        position: usize,
        token: String,
    },

    #[error("No reference group given (use [reference] in the input file or --control-labels/--control-values)")]
    MissingReference,

    #[error("Reference needs both labels and values")]
    IncompleteReference,

    #[error("No condition groups given")]
    NoConditions,

    #[error("{count} condition groups given, the limit is {limit}")]
    TooManyConditions { count: usize, limit: usize },

    #[error("Invalid condition spec '{0}' (expected NAME:LABELS:VALUES)")]
    MalformedConditionSpec(String),

    #[error("Failed to parse input file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for input collection
pub type Result<T> = std::result::Result<T, InputError>;

/// Split comma-delimited labels, trimming whitespace and dropping empty entries
pub fn parse_labels(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse comma-delimited decimal values
///
/// Empty entries are skipped; positions in errors are 1-based over the
/// non-empty entries.
///
/// # Example
/// ```
/// use qpcr_optimizer::input::parse_values;
///
/// assert_eq!(parse_values("reference", "1.0, 0.9,,1.1").unwrap(), vec![1.0, 0.9, 1.1]);
/// assert!(parse_values("reference", "1.0, abc").is_err());
/// ```
pub fn parse_values(group: &str, text: &str) -> Result<Vec<f64>> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(idx, token)| {
            let value: f64 = token.parse().map_err(|_| InputError::MalformedValue {
                group: group.to_string(),
                position: idx + 1,
                token: token.to_string(),
            })?;
            if value.is_finite() {
                Ok(value)
            } else {
                Err(InputError::NonFiniteValue {
                    group: group.to_string(),
                    position: idx + 1,
                    token: token.to_string(),
                })
            }
        })
        .collect()
}

/// Reference group as delimited text
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReferenceText {
    pub labels: String,
    pub values: String,
}

/// One named condition group as delimited text
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConditionText {
    pub name: String,
    pub labels: String,
    pub values: String,
}

impl ConditionText {
    /// Parse an inline `NAME:LABELS:VALUES` spec
    ///
    /// The name may not contain ':'; labels and values are comma-delimited.
    pub fn from_spec(spec: &str) -> Result<Self> {
        let mut parts = spec.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(labels), Some(values)) if !name.trim().is_empty() => Ok(Self {
                name: name.trim().to_string(),
                labels: labels.to_string(),
                values: values.to_string(),
            }),
            _ => Err(InputError::MalformedConditionSpec(spec.to_string())),
        }
    }

    fn into_group(self) -> Result<GroupInput> {
        let values = parse_values(&self.name, &self.values)?;
        Ok(GroupInput::new(self.name, parse_labels(&self.labels), values))
    }
}

/// Parsed TOML input file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputFile {
    pub reference: Option<ReferenceText>,
    #[serde(default, rename = "condition")]
    pub conditions: Vec<ConditionText>,
    pub settings: Option<OptimizeConfig>,
}

impl InputFile {
    /// Parse an input document
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse an input file
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }
}

/// Assembles an [`OptimizationRequest`] from file and inline sources
#[derive(Debug, Clone)]
pub struct InputCollector {
    max_conditions: usize,
    reference: Option<ReferenceText>,
    conditions: Vec<ConditionText>,
}

impl Default for InputCollector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONDITIONS)
    }
}

impl InputCollector {
    pub fn new(max_conditions: usize) -> Self {
        Self {
            max_conditions,
            reference: None,
            conditions: Vec::new(),
        }
    }

    /// Take the reference and conditions from an input file
    pub fn with_file(mut self, file: InputFile) -> Self {
        if file.reference.is_some() {
            self.reference = file.reference;
        }
        self.conditions.extend(file.conditions);
        self
    }

    /// Override the reference with inline text
    pub fn with_reference(mut self, labels: Option<String>, values: Option<String>) -> Result<Self> {
        match (labels, values) {
            (Some(labels), Some(values)) => {
                self.reference = Some(ReferenceText { labels, values });
                Ok(self)
            }
            (None, None) => Ok(self),
            _ => Err(InputError::IncompleteReference),
        }
    }

    /// Append a condition group after any file conditions
    pub fn with_condition(mut self, condition: ConditionText) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Parse all collected text into a request
    pub fn collect(self) -> Result<OptimizationRequest> {
        let reference = self.reference.ok_or(InputError::MissingReference)?;

        if self.conditions.is_empty() {
            return Err(InputError::NoConditions);
        }
        if self.conditions.len() > self.max_conditions {
            return Err(InputError::TooManyConditions {
                count: self.conditions.len(),
                limit: self.max_conditions,
            });
        }

        let reference_values = parse_values("reference", &reference.values)?;
        let conditions = self
            .conditions
            .into_iter()
            .map(ConditionText::into_group)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            n = reference_values.len(),
            conditions = conditions.len(),
            "collected input"
        );

        Ok(OptimizationRequest::new(
            parse_labels(&reference.labels),
            reference_values,
            conditions,
        ))
    }
}
