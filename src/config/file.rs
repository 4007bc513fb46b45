//! Configuration file and environment variable sources

use std::path::{Path, PathBuf};

use super::{parser, ConfigSource};
use crate::error::{Result, ScanError};
use crate::models::config::PartialScanSettings;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".modscan.toml";

/// Prefix of the environment variables read by [`EnvConfig`]
pub const ENV_PREFIX: &str = "MODSCAN";

/// Configuration file source
pub struct FileConfig {
    path: PathBuf,
    name: String,
    priority: u8,
}

impl FileConfig {
    /// Create a new file configuration source with the default path
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            name: "default config file".to_string(),
            priority: 20,
        }
    }

    /// Create a new file configuration source with a custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: format!("config file ({})", path.as_ref().display()),
            priority: 20,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a default configuration file at this location
    pub fn create_default(&self) -> Result<()> {
        parser::create_default_config(&self.path)
    }
}

impl ConfigSource for FileConfig {
    fn load(&self) -> Result<PartialScanSettings> {
        if !self.is_available() {
            return Err(ScanError::ConfigNotFound {
                path: self.path.clone(),
            });
        }

        parser::parse_config_file(&self.path)
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment variable configuration source.
///
/// Lists are comma separated; booleans accept `true`/`false`/`1`/`0`.
pub struct EnvConfig {
    prefix: String,
    name: String,
    priority: u8,
}

const ENV_KEYS: [&str; 10] = [
    "BASE_DIRECTORY",
    "RECURSE",
    "INCLUDE_LOADED",
    "THROW_ON_ERROR",
    "MARKER",
    "EXCLUDE",
    "EXCLUDE_TYPES",
    "ADDITIONAL_PATHS",
    "OUTPUT_FORMAT",
    "LOG",
];

impl EnvConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            name: format!("{} environment variables", &prefix),
            prefix,
            priority: 10,
        }
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}_{}", self.prefix, key)).ok()
    }

    fn flag(&self, key: &str) -> Result<Option<bool>> {
        match self.var(key) {
            None => Ok(None),
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => Ok(Some(true)),
                "0" | "false" | "no" => Ok(Some(false)),
                other => Err(ScanError::config_error(format!(
                    "{}_{} must be a boolean, got '{}'",
                    self.prefix, key, other
                ))),
            },
        }
    }

    fn list(&self, key: &str) -> Option<Vec<String>> {
        self.var(key).map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
    }
}

impl ConfigSource for EnvConfig {
    fn load(&self) -> Result<PartialScanSettings> {
        let mut settings = PartialScanSettings {
            base_directory: self.var("BASE_DIRECTORY").map(PathBuf::from),
            recurse_subdirectories: self.flag("RECURSE")?,
            include_loaded_modules: self.flag("INCLUDE_LOADED")?,
            throw_on_error: self.flag("THROW_ON_ERROR")?,
            marker_module: self.var("MARKER"),
            excluded_modules: self.list("EXCLUDE"),
            excluded_types: self.list("EXCLUDE_TYPES"),
            additional_paths: self
                .list("ADDITIONAL_PATHS")
                .map(|paths| paths.into_iter().map(PathBuf::from).collect()),
            log_filter: self.var("LOG"),
            ..Default::default()
        };

        if let Some(format) = self.var("OUTPUT_FORMAT") {
            settings.output_format = Some(format.parse().map_err(|_| ScanError::InvalidOutputFormat { format })?);
        }

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        ENV_KEYS.iter().any(|key| self.var(key).is_some())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
