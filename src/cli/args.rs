//! Command-line argument parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// modscan - find plugin modules that build on the host core module
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "modscan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find plugin modules that reference the host's core module and list the types they declare")]
#[command(long_about = "modscan inspects the module images in a plugin directory, keeps the modules whose \
reference graph reaches the marker module (Host.Core unless configured otherwise), and reports the \
reference types those modules declare. Files that are not module images, platform runtime modules and \
well-known third-party modules are skipped.")]
#[command(after_help = "EXAMPLES:

    # Scan the current directory
    modscan

    # Scan a plugin directory including subdirectories
    modscan --path ./plugins --recurse

    # Keep going when a module fails to load and report it instead
    modscan --continue-on-error

    # Skip modules by name (case and extension are ignored)
    modscan --exclude Legacy.Billing --exclude tools.exe

    # Use a different marker module
    modscan --marker Acme.Core

    # JSON report written to a file
    modscan --output json --output-file report.json

    # Create a default .modscan.toml in the current directory
    modscan --init

EXIT STATUS:
    0  scan completed without errors
    1  scan completed but some modules or types could not be loaded
    2  scan aborted
")]
pub struct Args {
    /// Directory to scan for module images
    #[arg(short, long, value_name = "PATH", help = "Directory to scan for module images (defaults to the current directory)")]
    pub path: Option<PathBuf>,

    /// Descend into subdirectories
    #[arg(short, long, help = "Also scan subdirectories of the base directory")]
    pub recurse: bool,

    /// Do not scan modules already resident in the process
    #[arg(long, help = "Do not scan modules already resident in the host process")]
    pub no_loaded: bool,

    /// Record load failures instead of aborting
    #[arg(long, help = "Record module and type load failures and keep scanning instead of aborting")]
    pub continue_on_error: bool,

    /// Marker module name
    #[arg(short, long, value_name = "NAME", help = "Name of the module a plugin must reference (default: Host.Core)")]
    pub marker: Option<String>,

    /// Module names to exclude
    #[arg(short, long, value_name = "NAME", help = "Module name to skip; case and a trailing module extension are ignored (repeatable)")]
    pub exclude: Vec<String>,

    /// Type names to exclude
    #[arg(long, value_name = "TYPE", help = "Type to leave out of the report, as Full.Name or 'Full.Name, Module' (repeatable)")]
    pub exclude_type: Vec<String>,

    /// Additional module files to consider
    #[arg(short, long, value_name = "FILE", help = "Extra module file to consider besides the base directory (repeatable)")]
    pub include: Vec<PathBuf>,

    /// Output format (text, json, csv)
    #[arg(short, long, value_enum, help = "Output format: 'text' for humans, 'json' for tools, 'csv' for spreadsheets (default: text)")]
    pub output: Option<OutputFormat>,

    /// Output file path (stdout if not specified)
    #[arg(long, value_name = "FILE", help = "File to write the report to (uses stdout if not specified)")]
    pub output_file: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short, long, help = "Print only a one-line summary and log errors only")]
    pub quiet: bool,

    /// Show every module and type
    #[arg(short, long, help = "List every module, type and skipped file, and log at debug level")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, help = "Disable colored output")]
    pub no_colors: bool,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", help = "Path to configuration file (defaults to .modscan.toml in the current directory)")]
    pub config: Option<PathBuf>,

    /// Log filter directive
    #[arg(long = "log", value_name = "FILTER", help = "Log filter directive such as 'modscan=debug'; RUST_LOG takes precedence")]
    pub log_filter: Option<String>,

    /// Initialize a default configuration file
    #[arg(long, help = "Create a default configuration file (.modscan.toml) in the current directory")]
    pub init: bool,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output for spreadsheet analysis
    Csv,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }
}
