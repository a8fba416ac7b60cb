//! HTML output format for ranked pairings
//!
//! Standalone report with embedded CSS: one table per condition, skipped
//! groups listed at the end.

use crate::optimize::{OptimizationResult, SkippedCondition};
use crate::report::{report_rows, Precision, ReportRow};

/// HTML output formatter
#[derive(Debug)]
pub struct HtmlOutput {
    /// (condition name, candidates ranked, rows)
    sections: Vec<(String, u64, Vec<ReportRow>)>,
    skipped: Vec<SkippedCondition>,
}

impl HtmlOutput {
    /// Build a report from a result
    pub fn new(result: &OptimizationResult, precision: Precision) -> Self {
        let mut rows = report_rows(result, precision).into_iter().peekable();
        let mut sections = Vec::with_capacity(result.conditions.len());

        for condition in &result.conditions {
            let mut section = Vec::with_capacity(condition.candidates.len());
            while let Some(row) = rows.next_if(|row| row.condition == condition.condition_name) {
                section.push(row);
            }
            sections.push((
                condition.condition_name.clone(),
                condition.total_candidates,
                section,
            ));
        }

        Self {
            sections,
            skipped: result.skipped.clone(),
        }
    }

    /// Escape HTML special characters to prevent XSS
    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Generate embedded CSS styles
    fn generate_styles() -> &'static str {
        r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        h1, h2 {
            color: #333;
        }
        table {
            border-collapse: collapse;
            width: 100%;
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        th, td {
            border: 1px solid #ddd;
            padding: 8px;
            text-align: left;
        }
        th {
            background-color: #4a90d9;
            color: white;
            font-weight: bold;
        }
        tr:nth-child(even) {
            background-color: #f9f9f9;
        }
        tr.best {
            background-color: #e6f4ea;
        }
        .mapping {
            font-family: monospace;
            color: #0066cc;
        }
        .numeric {
            font-family: monospace;
        }
        .values {
            font-family: monospace;
            font-size: 0.85em;
            color: #555;
        }
        .skipped {
            color: #cc0000;
        }
        .footer {
            margin-top: 20px;
            font-size: 0.8em;
            color: #888;
            text-align: center;
        }
        "#
    }

    /// Generate HTML table header
    fn generate_header() -> String {
        let headers = ["Rank", "Mapping", "Mean(2^-diff×100)", "SD(2^-diff×100)", "Transformed", "Diffs"];
        let header_cells: Vec<String> = headers.iter().map(|h| format!("<th>{}</th>", h)).collect();

        format!("<tr>{}</tr>", header_cells.join(""))
    }

    /// Format a report row as HTML table row
    fn format_row(row: &ReportRow) -> String {
        let class = if row.rank == 1 { r#" class="best""# } else { "" };

        let cells = [
            format!(r#"<td class="numeric">{}</td>"#, row.rank),
            format!(
                r#"<td class="mapping">{}</td>"#,
                Self::escape_html(&row.mapping)
            ),
            format!(r#"<td class="numeric">{}</td>"#, row.mean),
            format!(r#"<td class="numeric">{}</td>"#, row.sd),
            format!(
                r#"<td class="values">{}</td>"#,
                Self::escape_html(&row.transformed)
            ),
            format!(
                r#"<td class="values">{}</td>"#,
                Self::escape_html(&row.diffs)
            ),
        ];

        format!("<tr{}>{}</tr>", class, cells.join(""))
    }

    /// Generate complete HTML document
    pub fn to_html(&self) -> String {
        let mut html = String::new();

        // DOCTYPE and HTML start
        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n");

        // Head section
        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str("    <title>qPCR Pairing Report</title>\n");
        html.push_str("    <style>");
        html.push_str(Self::generate_styles());
        html.push_str("</style>\n");
        html.push_str("</head>\n");

        // Body section
        html.push_str("<body>\n");
        html.push_str("    <h1>qPCR Pairing Report</h1>\n");

        for (name, total, rows) in &self.sections {
            html.push_str(&format!(
                "    <h2>{} <small>({} of {} pairings)</small></h2>\n",
                Self::escape_html(name),
                rows.len(),
                total
            ));
            html.push_str("    <table>\n");
            html.push_str("        ");
            html.push_str(&Self::generate_header());
            html.push('\n');

            for row in rows {
                html.push_str("        ");
                html.push_str(&Self::format_row(row));
                html.push('\n');
            }

            html.push_str("    </table>\n");
        }

        if !self.skipped.is_empty() {
            html.push_str(&self.render_skipped());
        }

        // Footer
        html.push_str("    <div class=\"footer\">\n");
        html.push_str("        Generated by qpcr-optimizer\n");
        html.push_str("    </div>\n");

        html.push_str("</body>\n");
        html.push_str("</html>\n");

        html
    }

    /// Render skipped conditions as a list
    fn render_skipped(&self) -> String {
        let mut html = String::new();

        html.push_str("    <h2>Skipped Conditions</h2>\n");
        html.push_str("    <ul class=\"skipped\">\n");
        for skipped in &self.skipped {
            html.push_str(&format!(
                "        <li><strong>{}</strong>: {}</li>\n",
                Self::escape_html(&skipped.condition_name),
                Self::escape_html(&skipped.error.message)
            ));
        }
        html.push_str("    </ul>\n");

        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::{optimize, GroupInput, OptimizationRequest, OptimizeConfig};

    fn result_for(conditions: Vec<GroupInput>) -> OptimizationResult {
        let request = OptimizationRequest::new(
            vec!["A".into(), "B".into(), "C".into()],
            vec![20.0, 21.0, 22.5],
            conditions,
        );
        optimize(&request, &OptimizeConfig::lenient()).unwrap()
    }

    fn condition(name: &str) -> GroupInput {
        GroupInput::new(
            name,
            vec!["X".into(), "Y".into(), "Z".into()],
            vec![21.0, 22.5, 20.0],
        )
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(HtmlOutput::escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(HtmlOutput::escape_html("a&b"), "a&amp;b");
        assert_eq!(HtmlOutput::escape_html("\"test\""), "&quot;test&quot;");
        assert_eq!(HtmlOutput::escape_html("'test'"), "&#39;test&#39;");
    }

    #[test]
    fn test_html_output_basic_structure() {
        let html = HtmlOutput::new(&OptimizationResult::default(), Precision::default()).to_html();

        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("<head>"));
        assert!(html.contains("<body>"));
        assert!(html.contains("<style>"));
    }

    #[test]
    fn test_html_sections_per_condition() {
        let result = result_for(vec![condition("Cond1"), condition("Cond2")]);
        let output = HtmlOutput::new(&result, Precision::default());

        assert_eq!(output.sections.len(), 2);
        assert_eq!(output.sections[0].0, "Cond1");
        assert_eq!(output.sections[0].1, 6);
        assert_eq!(output.sections[0].2.len(), 6);

        let html = output.to_html();
        assert!(html.contains("Cond1 <small>(6 of 6 pairings)</small>"));
        assert!(html.contains("Cond2"));
        assert!(html.contains(r#"<tr class="best">"#));
    }

    #[test]
    fn test_html_output_escape_xss() {
        let result = result_for(vec![condition("<script>alert('xss')</script>")]);
        let html = HtmlOutput::new(&result, Precision::default()).to_html();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_html_lists_skipped() {
        let short = GroupInput::new("short", vec!["X".into()], vec![1.0]);
        let result = result_for(vec![condition("Cond1"), short]);
        let html = HtmlOutput::new(&result, Precision::default()).to_html();

        assert!(html.contains("Skipped Conditions"));
        assert!(html.contains("<strong>short</strong>"));
    }

    #[test]
    fn test_html_header_columns() {
        let header = HtmlOutput::generate_header();
        assert!(header.contains("Rank"));
        assert!(header.contains("Mapping"));
        assert!(header.contains("SD(2^-diff×100)"));
        assert!(header.contains("Diffs"));
    }
}
