//! Command-line argument configuration source

use std::path::PathBuf;

use super::ConfigSource;
use crate::cli::args::{Args, OutputFormat as CliOutputFormat};
use crate::error::Result;
use crate::models::config::{OutputFormat, PartialScanSettings};

/// Command-line argument configuration source
#[derive(Debug)]
pub struct CliConfig {
    args: CliArgs,
    name: String,
    priority: u8,
}

/// Command-line arguments relevant to configuration
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub path: Option<PathBuf>,
    pub recurse: bool,
    pub no_loaded: bool,
    pub continue_on_error: bool,
    pub marker: Option<String>,
    pub exclude: Option<Vec<String>>,
    pub exclude_types: Option<Vec<String>>,
    pub include: Option<Vec<PathBuf>>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub quiet: bool,
    pub verbose: bool,
    pub no_colors: bool,
    pub log_filter: Option<String>,
    pub config: Option<PathBuf>,
}

fn non_empty<T: Clone>(values: &[T]) -> Option<Vec<T>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

impl From<&Args> for CliArgs {
    fn from(args: &Args) -> Self {
        Self {
            path: args.path.clone(),
            recurse: args.recurse,
            no_loaded: args.no_loaded,
            continue_on_error: args.continue_on_error,
            marker: args.marker.clone(),
            exclude: non_empty(&args.exclude),
            exclude_types: non_empty(&args.exclude_type),
            include: non_empty(&args.include),
            output_format: args.output.map(|format| match format {
                CliOutputFormat::Text => OutputFormat::Text,
                CliOutputFormat::Json => OutputFormat::Json,
                CliOutputFormat::Csv => OutputFormat::Csv,
            }),
            output_file: args.output_file.clone(),
            quiet: args.quiet,
            verbose: args.verbose,
            no_colors: args.no_colors,
            log_filter: args.log_filter.clone(),
            config: args.config.clone(),
        }
    }
}

impl CliConfig {
    pub fn new(args: CliArgs) -> Self {
        Self {
            args,
            name: "command-line arguments".to_string(),
            priority: 30,
        }
    }

    pub fn from_args(args: &Args) -> Self {
        Self::new(CliArgs::from(args))
    }

    /// Get the config file path if specified
    pub fn config_path(&self) -> Option<&PathBuf> {
        self.args.config.as_ref()
    }
}

impl ConfigSource for CliConfig {
    fn load(&self) -> Result<PartialScanSettings> {
        let args = &self.args;

        // Flags only override when given; absent flags leave lower layers in effect
        Ok(PartialScanSettings {
            base_directory: args.path.clone(),
            recurse_subdirectories: args.recurse.then_some(true),
            include_loaded_modules: args.no_loaded.then_some(false),
            throw_on_error: args.continue_on_error.then_some(false),
            marker_module: args.marker.clone(),
            excluded_modules: args.exclude.clone(),
            excluded_types: args.exclude_types.clone(),
            additional_paths: args.include.clone(),
            output_format: args.output_format,
            output_file: args.output_file.clone(),
            use_colors: args.no_colors.then_some(false),
            quiet: args.quiet.then_some(true),
            verbose: args.verbose.then_some(true),
            log_filter: args.log_filter.clone(),
        })
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
