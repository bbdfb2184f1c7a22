//! Report formatters
//!
//! Text output keeps the classic console layout, one `<secs>    <label>`
//! line per variant. JSON is for tooling and CI.

use std::io::{self, Write};

use crate::reduce::MinMax;
use crate::suite::Report;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain console lines
    #[default]
    Text,
    /// Pretty-printed JSON array of reports
    Json,
}

fn push_min_max(output: &mut String, suffix: &str, mm: MinMax) {
    output.push_str(&format!(
        "max{suffix}: {:.6}, min{suffix}: {:.6}\n",
        mm.max, mm.min
    ));
}

/// Format one report as console text
#[must_use]
pub fn format_text(report: &Report) -> String {
    let mut output = String::new();

    if let Some(reference) = report.reference {
        push_min_max(&mut output, "_ref", reference);
    }

    for record in &report.records {
        output.push_str(&format!("{:.6}    {}\n", record.elapsed_secs, record.label));
        if let Some(parallel) = record.parallel_secs {
            output.push_str(&format!("midtime of {}: {:.6}\n", record.label, parallel));
        }
        if let Some(result) = record.result {
            push_min_max(&mut output, "", result);
        }
    }

    output
}

/// Format reports as a pretty JSON array
///
/// # Errors
///
/// Returns a serialization error if a report cannot be encoded.
pub fn format_json(reports: &[Report]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(reports)
}

/// Write reports to `out` in the specified format
///
/// # Errors
///
/// Returns `io::Error` if writing fails or JSON serialization fails.
pub fn write_reports<W: Write>(
    out: &mut W,
    reports: &[Report],
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => {
            for report in reports {
                write!(out, "{}", format_text(report))?;
            }
        }
        OutputFormat::Json => {
            let json = format_json(reports).map_err(io::Error::other)?;
            writeln!(out, "{json}")?;
        }
    }
    Ok(())
}

/// Write reports to stdout
///
/// # Errors
///
/// Returns `io::Error` if writing to stdout fails or JSON serialization fails.
pub fn write_report(reports: &[Report], format: OutputFormat) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write_reports(&mut stdout, reports, format)
}
