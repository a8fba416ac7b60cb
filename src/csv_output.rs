//! CSV output format for ranked pairings
//!
//! Spreadsheet sink: one row per reported candidate, conditions in input order.

use crate::report::ReportRow;

/// CSV output formatter
#[derive(Debug, Default)]
pub struct CsvOutput {
    rows: Vec<ReportRow>,
}

impl CsvOutput {
    /// Create a new CSV output formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a formatter from pre-rendered rows
    pub fn from_rows(rows: Vec<ReportRow>) -> Self {
        Self { rows }
    }

    /// Add a row to the output
    pub fn add_row(&mut self, row: ReportRow) {
        self.rows.push(row);
    }

    /// CSV header row
    fn header() -> &'static str {
        "condition,rank,mapping,mean,sd,transformed,diffs"
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        // If field contains comma, quote, or line break, wrap in quotes and escape quotes
        if field.contains(',')
            || field.contains('"')
            || field.contains('\n')
            || field.contains('\r')
        {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    /// Format a report row as CSV
    fn format_row(row: &ReportRow) -> String {
        [
            Self::escape_field(&row.condition),
            row.rank.to_string(),
            Self::escape_field(&row.mapping),
            row.mean.to_string(),
            row.sd.to_string(),
            Self::escape_field(&row.transformed),
            Self::escape_field(&row.diffs),
        ]
        .join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(Self::header());
        output.push('\n');

        for row in &self.rows {
            output.push_str(&Self::format_row(row));
            output.push('\n');
        }

        output
    }
}
