//! Command implementations

use std::path::Path;
use tracing::debug;

use super::Args;
use crate::config::{self, CliArgs, DEFAULT_CONFIG_FILE};
use crate::core::ModuleScanner;
use crate::error::{Result, ScanError};
use crate::output::{create_formatter, create_writer, ScanReport};
use crate::utils::init_logging;

/// Exit code for a scan that completed without errors
pub const EXIT_CLEAN: i32 = 0;
/// Exit code for a scan that completed but recorded load or type failures
pub const EXIT_ERRORS_OCCURRED: i32 = 1;
/// Exit code for a scan that could not complete
pub const EXIT_FATAL: i32 = 2;

/// Available commands
#[derive(Debug)]
pub enum Command {
    /// Scan for plugin modules
    Scan(Args),
    /// Initialize a default configuration file
    Init,
}

impl Command {
    /// Create a command from parsed arguments
    pub fn from_args(args: Args) -> Self {
        if args.init {
            return Command::Init;
        }

        Command::Scan(args)
    }

    /// Execute the command; `Ok(true)` means the scan completed with errors
    pub fn execute(&self) -> Result<bool> {
        match self {
            Command::Scan(args) => {
                self.validate()?;

                let settings = config::load_config(CliArgs::from(args))?;
                init_logging(
                    settings.log_filter.as_deref(),
                    settings.verbose,
                    settings.quiet,
                    settings.use_colors,
                );
                debug!("Settings: {:?}", settings);

                let result = ModuleScanner::with_process_registry(settings.clone()).scan()?;
                let report = ScanReport::new(&result, &settings);

                // Never write escape codes into a report file
                let use_colors = settings.use_colors && settings.output_file.is_none();
                let formatter = create_formatter(settings.output_format, use_colors, settings.verbose, settings.quiet);
                create_writer(settings.output_file.as_ref()).write(&formatter.format(&report)?)?;

                Ok(result.errors_occurred)
            }
            Command::Init => {
                init_config(Path::new(DEFAULT_CONFIG_FILE))?;
                Ok(false)
            }
        }
    }

    /// Validate the command arguments
    pub fn validate(&self) -> Result<()> {
        match self {
            Command::Scan(args) => {
                if let Some(path) = &args.path {
                    if !path.is_dir() {
                        return Err(ScanError::InvalidPath { path: path.clone() });
                    }
                }

                if let Some(config_path) = &args.config {
                    if !config_path.exists() {
                        return Err(ScanError::ConfigNotFound {
                            path: config_path.clone(),
                        });
                    }
                }

                Ok(())
            }
            Command::Init => Ok(()),
        }
    }

    /// Run the command and map the outcome to an exit code
    pub fn run(&self) -> i32 {
        match self.execute() {
            Ok(false) => EXIT_CLEAN,
            Ok(true) => EXIT_ERRORS_OCCURRED,
            // Any error means no complete report was written
            Err(err) => {
                eprintln!("{}: {}", err.severity(), err.user_message());
                EXIT_FATAL
            }
        }
    }
}

/// Write the default configuration to `path` unless a file is already there
pub fn init_config(path: &Path) -> Result<bool> {
    if path.exists() {
        println!("Configuration file already exists at: {}", path.display());
        println!("To overwrite it, delete the file first and run this command again.");
        return Ok(false);
    }

    config::create_default_config(path)?;

    println!("Created default configuration file at: {}", path.display());
    println!("Edit it to set the plugin directory, marker module and exclusions.");
    Ok(true)
}
