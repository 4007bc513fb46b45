//! Error types and definitions for modscan
//!
//! [`ScanError`] is the crate-wide error returned by scans, configuration and output.
//! [`LoadError`] is the typed failure a module registry reports when it cannot
//! produce a module; the scanner decides whether such a failure is a skip or fatal.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error severity levels for different error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Warning level errors - operation can continue
    Warning,
    /// Error level - current operation fails but overall process can continue
    Error,
    /// Critical level - process should terminate
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Failure to produce a module from a file or an identity
#[derive(Debug, Error)]
pub enum LoadError {
    /// No module with the requested identity could be located
    #[error("Could not locate module '{name}'")]
    NotFound { name: String },

    /// The file is not a module image at all
    #[error("'{path}' is not a module image: {message}")]
    InvalidFormat { path: PathBuf, message: String },

    /// The file looks like a module image but its content cannot be decoded
    #[error("Module image '{path}' is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// The image was produced for a newer format than this host understands
    #[error("Module image '{path}' uses format version {found}, this host supports up to {supported}")]
    Incompatible {
        path: PathBuf,
        found: u16,
        supported: u16,
    },

    /// A signed module was requested but a different version is available
    #[error("Requested '{requested}' but found '{found}'")]
    VersionMismatch { requested: String, found: String },

    /// Reading the file failed
    #[error("Could not read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// Whether the failure means the file is not a module image
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, LoadError::InvalidFormat { .. })
    }
}

/// Main error type for modscan operations
#[derive(Debug, Error)]
pub enum ScanError {
    /// Standard IO errors
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Permission denied errors
    #[error("Permission denied accessing {path}")]
    PermissionDenied { path: PathBuf },

    /// Invalid path errors
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// CSV handling errors
    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    /// Configuration file not found
    #[error("Configuration file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file read errors
    #[error("Error reading configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file parse errors
    #[error("Error parsing configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid output format
    #[error("Invalid output format: {format}")]
    InvalidOutputFormat { format: String },

    /// Output file write errors
    #[error("Error writing to output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stdout write errors
    #[error("Error writing to stdout: {source}")]
    StdoutWrite {
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal errors
    #[error("Directory traversal error for {path}: {message}")]
    DirectoryTraversal { path: PathBuf, message: String },

    /// A candidate module failed to load while the scan was configured to throw
    #[error("Could not load '{path}'. Consider excluding that module from the scanning.")]
    ModuleLoad {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    /// Some types of a relevant module failed to resolve while the scan was configured to throw
    #[error("{message}")]
    TypeLoad { module: String, message: String },

    /// Module image encoding errors
    #[error("Module image encoding error: {source}")]
    ImageEncode {
        #[source]
        source: bincode::Error,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {source}")]
    JsonSerialize {
        #[source]
        source: serde_json::Error,
    },

    /// Output directory not found
    #[error("Output directory not found: {path}")]
    OutputDirectoryNotFound { path: PathBuf },
}

impl ScanError {
    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ScanError::PermissionDenied { .. } => ErrorSeverity::Warning,

            ScanError::Config { .. } => ErrorSeverity::Critical,
            ScanError::ConfigNotFound { .. } => ErrorSeverity::Critical,
            ScanError::ConfigRead { .. } => ErrorSeverity::Critical,
            ScanError::ConfigParse { .. } => ErrorSeverity::Critical,
            ScanError::InvalidOutputFormat { .. } => ErrorSeverity::Critical,
            ScanError::StdoutWrite { .. } => ErrorSeverity::Critical,
            ScanError::OutputDirectoryNotFound { .. } => ErrorSeverity::Critical,
            // Only raised when the caller asked for fail-fast scanning
            ScanError::ModuleLoad { .. } => ErrorSeverity::Critical,
            ScanError::TypeLoad { .. } => ErrorSeverity::Critical,

            _ => ErrorSeverity::Error,
        }
    }

    /// Check if this is a critical error that should terminate the process
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ScanError::PermissionDenied { path } => {
                format!("Cannot access '{}' due to permission denied. Check file permissions.", path.display())
            }
            ScanError::Io { source } => {
                format!("File system error: {}. Check disk space and permissions.", source)
            }
            ScanError::InvalidPath { path } => {
                format!("Invalid path: '{}'. Please provide a valid directory path.", path.display())
            }
            ScanError::ConfigNotFound { path } => {
                format!("Configuration file not found at '{}'. Create a config file or use command line options.", path.display())
            }
            ScanError::ModuleLoad { path, source } => {
                format!("Could not load '{}': {}. Exclude the module or scan with --continue-on-error.", path.display(), source)
            }
            ScanError::OutputDirectoryNotFound { path } => {
                format!("Output directory '{}' does not exist. Please create the directory or specify a different output path.", path.display())
            }
            _ => self.to_string(),
        }
    }

    /// Create an IO error with context
    pub fn io_error(source: std::io::Error) -> Self {
        ScanError::Io { source }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        ScanError::Config {
            message: message.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        ScanError::PermissionDenied { path: path.into() }
    }

    /// Create a directory traversal error
    pub fn directory_traversal_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ScanError::DirectoryTraversal {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        ScanError::io_error(err)
    }
}

impl From<csv::Error> for ScanError {
    fn from(err: csv::Error) -> Self {
        ScanError::Csv { source: err }
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        ScanError::JsonSerialize { source: err }
    }
}

impl From<bincode::Error> for ScanError {
    fn from(err: bincode::Error) -> Self {
        ScanError::ImageEncode { source: err }
    }
}

/// Result type alias for modscan operations
pub type Result<T> = std::result::Result<T, ScanError>;
