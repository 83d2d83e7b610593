//! One-shot commands run from the terminal.

use std::path::Path;
use std::time::Instant;

use formcheck::report::pdf::DEFAULT_TITLE;
use formcheck::{render_report_pdf, VerificationReport, VerificationRequest, Verifier};
use tracing::info;

type CliResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Verifies `candidate` against `template` and prints the report as JSON.
pub fn run_verify(verifier: &Verifier, template: &Path, candidate: &Path, pretty: bool) -> CliResult {
    let start = Instant::now();
    let report = verifier.verify(&VerificationRequest::new(template, candidate))?;
    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Verification finished"
    );

    println!("{}", to_json(&report, pretty)?);
    Ok(())
}

/// Renders a previously produced JSON report as PDF.
pub fn run_export(report_path: &Path, output: &Path, title: Option<&str>) -> CliResult {
    let content = std::fs::read_to_string(report_path)
        .map_err(|e| format!("Failed to read report '{}': {}", report_path.display(), e))?;
    let report: VerificationReport = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid report '{}': {}", report_path.display(), e))?;

    let bytes = render_report_pdf(&report, title.unwrap_or(DEFAULT_TITLE))?;
    std::fs::write(output, &bytes)
        .map_err(|e| format!("Failed to write '{}': {}", output.display(), e))?;

    info!(output = %output.display(), bytes = bytes.len(), "Report exported");
    Ok(())
}

/// Writes the template's field map as JSON to `output`, or stdout when absent.
pub fn run_field_map(verifier: &Verifier, template: &Path, output: Option<&Path>) -> CliResult {
    let field_map = verifier.field_map(template)?;
    let json = serde_json::to_string_pretty(&field_map)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
            info!(
                output = %path.display(),
                fields = field_map.len(),
                "Field map written"
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn to_json(report: &VerificationReport, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    }
}
