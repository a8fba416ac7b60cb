//! CLI argument parsing for qpcr-optimizer

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::input::DEFAULT_MAX_CONDITIONS;
use crate::optimize::{FailurePolicy, OptimizeConfig};

/// Output format for ranked pairings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text table (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
    /// Standalone HTML report
    Html,
}

#[derive(Parser, Debug)]
#[command(name = "qpcr-optimizer")]
#[command(version)]
#[command(
    about = "Exhaustive search for the lowest-variance pairing of qPCR condition samples to controls",
    long_about = None
)]
pub struct Cli {
    /// TOML input file with [reference], [[condition]] and optional [settings]
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Control labels, comma-separated (e.g. A,B,C,D)
    #[arg(long = "control-labels", value_name = "LABELS")]
    pub control_labels: Option<String>,

    /// Control values, comma-separated (e.g. 1.0,0.9,1.1,1.0)
    #[arg(long = "control-values", value_name = "VALUES", allow_hyphen_values = true)]
    pub control_values: Option<String>,

    /// Condition group as NAME:LABELS:VALUES (repeatable)
    #[arg(
        short = 'c',
        long = "condition",
        value_name = "SPEC",
        allow_hyphen_values = true
    )]
    pub conditions: Vec<String>,

    /// Report the K best pairings per condition (default: 10)
    #[arg(short = 'k', long = "top-k", value_name = "K", conflicts_with = "all")]
    pub top_k: Option<usize>,

    /// Report every pairing instead of the top K
    #[arg(long = "all")]
    pub all: bool,

    /// Ceiling on the number of samples per group (default: 10)
    #[arg(long = "max-n", value_name = "N")]
    pub max_n: Option<usize>,

    /// Ceiling on the number of condition groups
    #[arg(long = "max-conditions", value_name = "COUNT", default_value_t = DEFAULT_MAX_CONDITIONS)]
    pub max_conditions: usize,

    /// Decimal places for diffs in exported rows (default: 4)
    #[arg(long = "diffs-precision", value_name = "DIGITS")]
    pub diffs_precision: Option<usize>,

    /// Decimal places for transformed values in exported rows (default: 6)
    #[arg(long = "transformed-precision", value_name = "DIGITS")]
    pub transformed_precision: Option<usize>,

    /// Skip invalid condition groups instead of aborting the batch
    #[arg(long = "skip-invalid")]
    pub skip_invalid: bool,

    /// Worker threads per condition (results are identical for any count)
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write output to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Layer command-line overrides on top of file (or default) settings
    pub fn apply_overrides(&self, mut config: OptimizeConfig) -> OptimizeConfig {
        if self.all {
            config.top_k = None;
        } else if let Some(k) = self.top_k {
            config.top_k = Some(k);
        }
        if let Some(max_n) = self.max_n {
            config.max_n = Some(max_n);
        }
        if let Some(digits) = self.diffs_precision {
            config.diffs_precision = digits;
        }
        if let Some(digits) = self.transformed_precision {
            config.transformed_precision = digits;
        }
        if self.skip_invalid {
            config.failure_policy = FailurePolicy::SkipGroup;
        }
        if let Some(jobs) = self.jobs {
            config.workers = jobs;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_inline_groups() {
        let cli = Cli::parse_from([
            "qpcr-optimizer",
            "--control-labels",
            "A,B",
            "--control-values",
            "1.0,0.9",
            "-c",
            "C1:X,Y:1.2,0.8",
            "-c",
            "C2:X,Y:1.1,0.7",
        ]);
        assert_eq!(cli.control_labels.as_deref(), Some("A,B"));
        assert_eq!(cli.control_values.as_deref(), Some("1.0,0.9"));
        assert_eq!(cli.conditions.len(), 2);
        assert_eq!(cli.conditions[1], "C2:X,Y:1.1,0.7");
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["qpcr-optimizer"]);
        assert!(cli.input.is_none());
        assert!(cli.top_k.is_none());
        assert!(!cli.all);
        assert!(!cli.skip_invalid);
        assert!(!cli.debug);
        assert_eq!(cli.max_conditions, DEFAULT_MAX_CONDITIONS);
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_cli_negative_values_accepted() {
        let cli = Cli::parse_from([
            "qpcr-optimizer",
            "--control-values",
            "-0.5,1.0",
            "-c",
            "C1:X,Y:-1.2,0.8",
        ]);
        assert_eq!(cli.control_values.as_deref(), Some("-0.5,1.0"));
    }

    #[test]
    fn test_cli_format_and_output() {
        let cli = Cli::parse_from([
            "qpcr-optimizer",
            "--format",
            "csv",
            "-o",
            "results.csv",
        ]);
        assert_eq!(cli.format, OutputFormat::Csv);
        assert_eq!(cli.output, Some(PathBuf::from("results.csv")));
    }

    #[test]
    fn test_cli_top_k_conflicts_with_all() {
        let result = Cli::try_parse_from(["qpcr-optimizer", "--top-k", "3", "--all"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_search_options() {
        let cli = Cli::parse_from([
            "qpcr-optimizer",
            "--max-n",
            "8",
            "--jobs",
            "4",
            "--skip-invalid",
            "--diffs-precision",
            "2",
        ]);
        assert_eq!(cli.max_n, Some(8));
        assert_eq!(cli.jobs, Some(4));
        assert!(cli.skip_invalid);
        assert_eq!(cli.diffs_precision, Some(2));
    }

    #[test]
    fn test_overrides_keep_unset_fields() {
        let file_settings = OptimizeConfig {
            top_k: Some(3),
            transformed_precision: 2,
            ..OptimizeConfig::default()
        };
        let cli = Cli::parse_from(["qpcr-optimizer", "--diffs-precision", "1"]);
        let config = cli.apply_overrides(file_settings);

        assert_eq!(config.top_k, Some(3));
        assert_eq!(config.transformed_precision, 2);
        assert_eq!(config.diffs_precision, 1);
        assert_eq!(config.failure_policy, FailurePolicy::AbortAll);
    }

    #[test]
    fn test_overrides_all_and_policy() {
        let cli = Cli::parse_from(["qpcr-optimizer", "--all", "--skip-invalid", "-j", "3"]);
        let config = cli.apply_overrides(OptimizeConfig::default());

        assert_eq!(config.top_k, None);
        assert_eq!(config.failure_policy, FailurePolicy::SkipGroup);
        assert_eq!(config.workers, 3);
    }
}
