//! Configuration-related data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Marker module name used when none is configured
pub const DEFAULT_MARKER_MODULE: &str = "Host.Core";

/// Main configuration settings for a scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Directory to scan for module images
    pub base_directory: PathBuf,

    /// Whether to descend into subdirectories of the base directory
    pub recurse_subdirectories: bool,

    /// Whether modules already resident in the process are scanned too
    pub include_loaded_modules: bool,

    /// Whether load and type failures abort the scan instead of being recorded
    pub throw_on_error: bool,

    /// Name of the module whose transitive presence marks a module as relevant
    pub marker_module: String,

    /// Module names never scanned (case-insensitive, extension-agnostic)
    pub excluded_modules: Vec<String>,

    /// Type names never reported, either `Full.Name` or `Full.Name, Module`
    pub excluded_types: Vec<String>,

    /// Extra module image files to consider besides the base directory
    pub additional_paths: Vec<PathBuf>,

    /// Output format (text, json, csv)
    pub output_format: OutputFormat,

    /// Output file path (if not specified, output to stdout)
    pub output_file: Option<PathBuf>,

    /// Whether to use colors in text output
    pub use_colors: bool,

    /// Whether to suppress non-essential output
    pub quiet: bool,

    /// Whether to list every module and type in text output and log at debug level
    pub verbose: bool,

    /// Log filter directive, overridden by RUST_LOG
    pub log_filter: Option<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            base_directory: PathBuf::from("."),
            recurse_subdirectories: false,
            include_loaded_modules: true,
            throw_on_error: true,
            marker_module: DEFAULT_MARKER_MODULE.to_string(),
            excluded_modules: Vec::new(),
            excluded_types: Vec::new(),
            additional_paths: Vec::new(),
            output_format: OutputFormat::Text,
            output_file: None,
            use_colors: true,
            quiet: false,
            verbose: false,
            log_filter: None,
        }
    }
}

impl ScanSettings {
    /// Settings scanning `base_directory` with every other option at its default
    pub fn for_directory(base_directory: impl Into<PathBuf>) -> Self {
        Self {
            base_directory: base_directory.into(),
            ..Self::default()
        }
    }
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output for spreadsheet analysis
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Partial settings for configuration merging
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialScanSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_directory: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurse_subdirectories: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_loaded_modules: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throw_on_error: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_modules: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_paths: Option<Vec<PathBuf>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_colors: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiet: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl PartialScanSettings {
    /// Merge another PartialScanSettings into this one
    /// Fields from `other` take precedence over existing fields
    pub fn merge_from(&mut self, other: PartialScanSettings) {
        if other.base_directory.is_some() {
            self.base_directory = other.base_directory;
        }
        if other.recurse_subdirectories.is_some() {
            self.recurse_subdirectories = other.recurse_subdirectories;
        }
        if other.include_loaded_modules.is_some() {
            self.include_loaded_modules = other.include_loaded_modules;
        }
        if other.throw_on_error.is_some() {
            self.throw_on_error = other.throw_on_error;
        }
        if other.marker_module.is_some() {
            self.marker_module = other.marker_module;
        }
        if other.excluded_modules.is_some() {
            self.excluded_modules = other.excluded_modules;
        }
        if other.excluded_types.is_some() {
            self.excluded_types = other.excluded_types;
        }
        if other.additional_paths.is_some() {
            self.additional_paths = other.additional_paths;
        }
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
        if other.output_file.is_some() {
            self.output_file = other.output_file;
        }
        if other.use_colors.is_some() {
            self.use_colors = other.use_colors;
        }
        if other.quiet.is_some() {
            self.quiet = other.quiet;
        }
        if other.verbose.is_some() {
            self.verbose = other.verbose;
        }
        if other.log_filter.is_some() {
            self.log_filter = other.log_filter;
        }
    }

    /// Convert to full settings, using defaults for unspecified fields
    pub fn to_settings(&self) -> ScanSettings {
        let defaults = ScanSettings::default();

        ScanSettings {
            base_directory: self.base_directory.clone().unwrap_or(defaults.base_directory),
            recurse_subdirectories: self.recurse_subdirectories.unwrap_or(defaults.recurse_subdirectories),
            include_loaded_modules: self.include_loaded_modules.unwrap_or(defaults.include_loaded_modules),
            throw_on_error: self.throw_on_error.unwrap_or(defaults.throw_on_error),
            marker_module: self.marker_module.clone().unwrap_or(defaults.marker_module),
            excluded_modules: self.excluded_modules.clone().unwrap_or(defaults.excluded_modules),
            excluded_types: self.excluded_types.clone().unwrap_or(defaults.excluded_types),
            additional_paths: self.additional_paths.clone().unwrap_or(defaults.additional_paths),
            output_format: self.output_format.unwrap_or(defaults.output_format),
            output_file: self.output_file.clone().or(defaults.output_file),
            use_colors: self.use_colors.unwrap_or(defaults.use_colors),
            quiet: self.quiet.unwrap_or(defaults.quiet),
            verbose: self.verbose.unwrap_or(defaults.verbose),
            log_filter: self.log_filter.clone().or(defaults.log_filter),
        }
    }
}
