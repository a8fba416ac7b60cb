//! Human-readable text table for terminal output
//!
//! Renders the same rows as the export layer, one block per condition.

use std::fmt::Write as _;

use crate::optimize::OptimizationResult;
use crate::report::{report_rows, Precision};

/// Render a result as aligned text, one block per condition
pub fn render_text(result: &OptimizationResult, precision: Precision) -> String {
    let mut out = String::new();
    let mut rows = report_rows(result, precision).into_iter().peekable();

    for condition in &result.conditions {
        let _ = writeln!(
            out,
            "=== {} (n={}, showing {} of {} pairings) ===",
            condition.condition_name,
            condition.n,
            condition.candidates.len(),
            condition.total_candidates
        );
        let _ = writeln!(
            out,
            "{:>6}  {:>12}  {:>12}  mapping | transformed | diffs",
            "rank", "sd", "mean"
        );
        let _ = writeln!(out, "{}", "─".repeat(72));

        while let Some(row) = rows.next_if(|row| row.condition == condition.condition_name) {
            let _ = writeln!(
                out,
                "{:>6}  {:>12.6}  {:>12.6}  {} | {} | {}",
                row.rank, row.sd, row.mean, row.mapping, row.transformed, row.diffs
            );
        }
        out.push('\n');
    }

    if !result.skipped.is_empty() {
        let _ = writeln!(out, "Skipped conditions:");
        for skipped in &result.skipped {
            let _ = writeln!(out, "  {}: {}", skipped.condition_name, skipped.error.message);
        }
    }

    out
}
