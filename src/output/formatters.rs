//! Output formatting functionality
//!
//! This module renders scan reports as text, JSON and CSV.

use ansi_term::Colour::{Blue, Green, Red, Yellow};
use ansi_term::Style;
use std::collections::BTreeMap;

use super::{ScanReport, SkippedRecord};
use crate::error::{Result, ScanError};

fn paint(use_colors: bool, style: Style, text: impl AsRef<str>) -> String {
    if use_colors {
        style.paint(text.as_ref()).to_string()
    } else {
        text.as_ref().to_string()
    }
}

fn format_skipped_line(skipped: &SkippedRecord, use_colors: bool) -> String {
    let marker = if skipped.reason.is_error() {
        paint(use_colors, Red.normal(), "!")
    } else {
        paint(use_colors, Style::new().dimmed(), "-")
    };

    format!("  {} {}: {}\n", marker, skipped.path.display(), skipped.message)
}

/// Format a scan report as text
pub fn format_report_text(report: &ScanReport, use_colors: bool, verbose: bool) -> String {
    let mut output = String::new();

    output.push_str(&paint(use_colors, Blue.bold(), "Module Scan Summary"));
    output.push_str("\n\n");

    output.push_str(&format!("Base directory: {}\n", report.base_directory.display()));
    output.push_str(&format!("Marker module: {}\n", report.marker_module));
    output.push_str(&format!("Relevant modules: {}\n", report.modules.len()));
    output.push_str(&format!("Types found: {}\n", report.types.len()));
    output.push_str(&format!("Skipped files: {}\n", report.skipped_files.len()));

    let failed: Vec<_> = report.failed_files().collect();
    if report.errors_occurred {
        output.push('\n');
        output.push_str(&paint(use_colors, Yellow.bold(), "Errors occurred during scanning"));
        output.push('\n');
        for skipped in &failed {
            output.push_str(&format_skipped_line(skipped, use_colors));
        }
    }

    if report.modules.is_empty() {
        return output;
    }

    let mut types_by_module: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for ty in &report.types {
        types_by_module.entry(ty.module_key.as_str()).or_default().push(ty.name.as_str());
    }

    output.push_str("\nModules:\n");
    for module in &report.modules {
        let types = types_by_module.get(module.key.as_str()).map(Vec::as_slice).unwrap_or(&[]);
        output.push_str(&format!(
            "  {} ({} types)\n",
            paint(use_colors, Green.bold(), &module.name),
            types.len()
        ));

        if verbose {
            output.push_str(&format!("    {}\n", paint(use_colors, Style::new().dimmed(), &module.full_name)));
            if let Some(path) = &module.path {
                output.push_str(&format!("    {}\n", paint(use_colors, Style::new().dimmed(), path.display().to_string())));
            }
            for name in types {
                output.push_str(&format!("    {}\n", name));
            }
        }
    }

    if verbose {
        let benign: Vec<_> = report.skipped_files.iter().filter(|s| !s.reason.is_error()).collect();
        if !benign.is_empty() {
            output.push_str("\nSkipped:\n");
            for skipped in benign {
                output.push_str(&format_skipped_line(skipped, use_colors));
            }
        }
    }

    output
}

/// Format a scan report as JSON
pub fn format_report_json(report: &ScanReport, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    };
    json.map_err(|e| ScanError::JsonSerialize { source: e })
}

/// Format a scan report as CSV, one row per discovered type
pub fn format_report_csv(report: &ScanReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);

    writer.write_record(["Type", "Kind", "Module", "Module Full Name", "Module Path"])?;

    for ty in &report.types {
        let module = report.modules.iter().find(|m| m.key == ty.module_key);
        let full_name = module.map(|m| m.full_name.clone()).unwrap_or_default();
        let path = module
            .and_then(|m| m.path.as_ref())
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let kind = format!("{:?}", ty.kind).to_lowercase();

        writer.write_record([ty.name.as_str(), kind.as_str(), ty.module.as_str(), full_name.as_str(), path.as_str()])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ScanError::Csv { source: e.into_error().into() })?;

    String::from_utf8(bytes).map_err(|e| ScanError::io_error(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
