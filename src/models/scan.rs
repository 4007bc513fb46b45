//! Scan result structures

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::module::Module;
use super::types::TypeDefinition;

/// Why a candidate file was not scanned
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// The file is not a module image (invalid format)
    InvalidFormat,
    /// The file is a platform runtime module
    PlatformModule,
    /// The file name matched a caller-supplied exclusion
    ExplicitlyExcluded,
    /// The file name matched the built-in exclusion list
    ExcludedByDefault,
    /// The file looked like a module image but failed to load
    LoadFailure(String),
}

impl SkipReason {
    /// Only load failures count as scan errors; every other skip is benign
    pub fn is_error(&self) -> bool {
        matches!(self, SkipReason::LoadFailure(_))
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidFormat => write!(f, "File is not a module image (invalid format)."),
            SkipReason::PlatformModule => write!(f, "File is a platform runtime module."),
            SkipReason::ExplicitlyExcluded => write!(f, "File was explicitly excluded from scanning."),
            SkipReason::ExcludedByDefault => write!(f, "File is excluded from scanning by default."),
            SkipReason::LoadFailure(message) => write!(f, "{}", message),
        }
    }
}

/// A file that was skipped during scanning, with the reason why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    path: PathBuf,
    reason: SkipReason,
}

impl SkippedFile {
    pub fn new(path: impl Into<PathBuf>, reason: SkipReason) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }

    /// The full path to the file that was skipped
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn reason(&self) -> &SkipReason {
        &self.reason
    }

    /// Human-readable description of the reason
    pub fn message(&self) -> String {
        self.reason.to_string()
    }
}

/// Everything a scan found
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Relevant modules, deduplicated by identity
    pub modules: Vec<Arc<Module>>,
    /// Types extracted from relevant modules, deduplicated by identity
    pub types: Vec<TypeDefinition>,
    /// Files that were not scanned, and why
    pub skipped_files: Vec<SkippedFile>,
    /// True if any load or partial type failure was downgraded to a warning
    pub errors_occurred: bool,
}

impl ScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a relevant module by simple name
    pub fn module(&self, name: &str) -> Option<&Arc<Module>> {
        self.modules.iter().find(|m| m.name() == name)
    }

    /// Whether a type with this full name was extracted
    pub fn contains_type(&self, name: &str) -> bool {
        self.types.iter().any(|t| t.name == name)
    }

    /// Types declared by the module with the given simple name
    pub fn types_from<'a>(&'a self, module_name: &'a str) -> impl Iterator<Item = &'a TypeDefinition> + 'a {
        self.types.iter().filter(move |t| t.module.name == module_name)
    }

    /// Skip record for a path, if any
    pub fn skipped(&self, path: &Path) -> Option<&SkippedFile> {
        self.skipped_files.iter().find(|s| s.path() == path)
    }
}
