//! Output formatting and writing functionality

mod formatters;
mod writers;

pub use self::writers::{create_writer, FileWriter, OutputWriter, StdoutWriter};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

use crate::error::Result;
use crate::models::config::{OutputFormat, ScanSettings};
use crate::models::{ModuleOrigin, ScanResult, SkipReason, TypeKind};

/// A relevant module as reported
#[derive(Debug, Clone, Serialize)]
pub struct ModuleRecord {
    pub name: String,
    pub full_name: String,
    /// Identity key that [`TypeRecord::module_key`] refers to
    #[serde(skip)]
    pub key: String,
    pub origin: &'static str,
    pub path: Option<PathBuf>,
}

/// A discovered type as reported
#[derive(Debug, Clone, Serialize)]
pub struct TypeRecord {
    pub name: String,
    pub module: String,
    #[serde(skip)]
    pub module_key: String,
    pub kind: TypeKind,
}

/// A skipped file as reported
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRecord {
    pub path: PathBuf,
    pub reason: SkipReason,
    pub message: String,
}

/// Serializable snapshot of a scan, independent of the live module handles
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub generated_at: DateTime<Utc>,
    pub version: &'static str,
    pub base_directory: PathBuf,
    pub marker_module: String,
    pub errors_occurred: bool,
    pub modules: Vec<ModuleRecord>,
    pub types: Vec<TypeRecord>,
    pub skipped_files: Vec<SkippedRecord>,
}

impl ScanReport {
    pub fn new(result: &ScanResult, settings: &ScanSettings) -> Self {
        let modules = result
            .modules
            .iter()
            .map(|module| ModuleRecord {
                name: module.name().to_string(),
                full_name: module.identity().full_name(),
                key: module.identity().key(),
                origin: match module.origin() {
                    _ if module.is_dynamic() => "dynamic",
                    ModuleOrigin::File(_) => "file",
                    ModuleOrigin::InProcess => "in-process",
                },
                path: module.path().map(|p| p.to_path_buf()),
            })
            .collect();

        let types = result
            .types
            .iter()
            .map(|ty| TypeRecord {
                name: ty.name.clone(),
                module: ty.module.name.clone(),
                module_key: ty.module.key(),
                kind: ty.kind,
            })
            .collect();

        let skipped_files = result
            .skipped_files
            .iter()
            .map(|skipped| SkippedRecord {
                path: skipped.path().to_path_buf(),
                reason: skipped.reason().clone(),
                message: skipped.message(),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            version: crate::VERSION,
            base_directory: settings.base_directory.clone(),
            marker_module: settings.marker_module.clone(),
            errors_occurred: result.errors_occurred,
            modules,
            types,
            skipped_files,
        }
    }

    /// Skipped files whose reason counts as an error
    pub fn failed_files(&self) -> impl Iterator<Item = &SkippedRecord> {
        self.skipped_files.iter().filter(|s| s.reason.is_error())
    }
}

/// Trait for different output formatters
pub trait Formatter {
    /// Format a scan report into a string
    fn format(&self, report: &ScanReport) -> Result<String>;
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    pub use_colors: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl TextFormatter {
    pub fn new(use_colors: bool, verbose: bool, quiet: bool) -> Self {
        Self {
            use_colors,
            verbose,
            quiet,
        }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, report: &ScanReport) -> Result<String> {
        if self.quiet {
            let mut output = format!(
                "Modules: {}, Types: {}, Skipped: {}\n",
                report.modules.len(),
                report.types.len(),
                report.skipped_files.len()
            );
            if report.errors_occurred {
                output.push_str("Errors occurred during scanning\n");
            }
            return Ok(output);
        }

        Ok(formatters::format_report_text(report, self.use_colors, self.verbose))
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, report: &ScanReport) -> Result<String> {
        formatters::format_report_json(report, self.pretty)
    }
}

/// CSV formatter, one row per discovered type
#[derive(Default)]
pub struct CsvFormatter;

impl CsvFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Formatter for CsvFormatter {
    fn format(&self, report: &ScanReport) -> Result<String> {
        formatters::format_report_csv(report)
    }
}

/// Create a formatter based on the output format
pub fn create_formatter(format: OutputFormat, use_colors: bool, verbose: bool, quiet: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(use_colors, verbose, quiet)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Csv => Box::new(CsvFormatter::new()),
    }
}
