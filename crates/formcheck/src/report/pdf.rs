use chrono::{DateTime, Utc};

use crate::error::ProcessError;
use crate::matcher::MatchStatus;
use crate::report::VerificationReport;
use crate::typeset::{self, PdfLayout};

pub const DEFAULT_TITLE: &str = "Template Verification Report";

/// Renders `report` as a paginated PDF: a header, then one block per result.
pub fn render_report_pdf(report: &VerificationReport, title: &str) -> Result<Vec<u8>, ProcessError> {
    let _span = tracing::info_span!("report.pdf", mode = %report.mode(), results = report.len())
        .entered();

    let layout = PdfLayout::report();
    let lines: Vec<String> = report_lines(report, title, Utc::now())
        .iter()
        .flat_map(|line| typeset::wrap_line(line, layout.max_line_chars))
        .collect();

    typeset::render_lines(&lines, &layout)
}

pub fn report_lines(
    report: &VerificationReport,
    title: &str,
    generated_at: DateTime<Utc>,
) -> Vec<String> {
    let summary = report.summary();
    let mut lines = vec![
        title.to_string(),
        format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
        format!(
            "Mode: {} | Matched {} of {} | Overall accuracy: {:.2}%",
            report.mode(),
            summary.matched,
            summary.total,
            summary.accuracy
        ),
        String::new(),
    ];

    match report {
        VerificationReport::Fields { results, .. } => {
            for result in results {
                lines.push(format!("Field: {}", result.text));
                lines.push(format!(
                    "Status: {}",
                    if result.matched { "match" } else { "no match" }
                ));
                lines.push(format!(
                    "Expected position: ({}, {})",
                    result.expected_position[0], result.expected_position[1]
                ));
                lines.push(String::new());
            }
        }
        VerificationReport::Headings { results, .. } => {
            for result in results {
                lines.push(format!("Heading: {}", result.heading));
                lines.push(format!(
                    "Status: {} | Accuracy: {:.2}%",
                    status_label(result.status),
                    result.accuracy
                ));
                lines.push(format!("Template: {}", result.template_context));
                lines.push(format!(
                    "Resume: {}",
                    result.resume_context.as_deref().unwrap_or("(not found)")
                ));
                lines.push(String::new());
            }
        }
    }

    lines
}

fn status_label(status: MatchStatus) -> &'static str {
    match status {
        MatchStatus::Match => "match",
        MatchStatus::Mismatch => "mismatch",
        MatchStatus::Missing => "missing",
    }
}
