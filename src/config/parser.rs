//! Configuration file parsing utilities

use std::fs;
use std::path::{Path, PathBuf};

use super::file::DEFAULT_CONFIG_FILE;
use crate::error::{Result, ResultExt, ScanError};
use crate::models::config::PartialScanSettings;

/// Parse a TOML configuration file into PartialScanSettings
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<PartialScanSettings> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ScanError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| ScanError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config_content(&content, path)
}

/// Parse TOML configuration content into PartialScanSettings
pub fn parse_config_content<P: AsRef<Path>>(content: &str, path: P) -> Result<PartialScanSettings> {
    let path = path.as_ref();

    let settings: PartialScanSettings = toml::from_str(content).map_err(|e| ScanError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate_partial_settings(&settings, path)?;

    Ok(settings)
}

/// Validate partial settings for obvious errors
pub fn validate_partial_settings<P: AsRef<Path>>(settings: &PartialScanSettings, path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(base_directory) = &settings.base_directory {
        if base_directory.as_os_str().is_empty() {
            return Err(ScanError::config_error(format!(
                "Invalid empty base_directory in config file: {}",
                path.display()
            )));
        }
    }

    if let Some(marker) = &settings.marker_module {
        if marker.trim().is_empty() {
            return Err(ScanError::config_error(format!(
                "Invalid empty marker_module in config file: {}",
                path.display()
            )));
        }
    }

    let names = settings
        .excluded_modules
        .iter()
        .flatten()
        .map(|name| ("excluded_modules", name))
        .chain(settings.excluded_types.iter().flatten().map(|name| ("excluded_types", name)));
    for (key, name) in names {
        if name.trim().is_empty() {
            return Err(ScanError::config_error(format!(
                "Empty entry in {} in config file: {}",
                key,
                path.display()
            )));
        }
    }

    if let Some(output_file) = &settings.output_file {
        if output_file.as_os_str().is_empty() {
            return Err(ScanError::config_error(format!(
                "Invalid empty output_file in config file: {}",
                path.display()
            )));
        }
    }

    Ok(())
}

/// Locations searched for a configuration file, in order
pub fn default_config_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(DEFAULT_CONFIG_FILE)];

    if let Some(home_dir) = dirs::home_dir() {
        locations.push(home_dir.join(DEFAULT_CONFIG_FILE));
    }

    if let Some(config_dir) = dirs::config_dir() {
        locations.push(config_dir.join("modscan").join("config.toml"));
    }

    locations
}

/// Find and load configuration from the first default location that has a file
pub fn find_default_config() -> Result<Option<PartialScanSettings>> {
    find_config_in(default_config_locations())
}

/// Load the first of `locations` that is a file; a file that fails to parse is an error
pub fn find_config_in(locations: impl IntoIterator<Item = PathBuf>) -> Result<Option<PartialScanSettings>> {
    match locations.into_iter().find(|location| location.is_file()) {
        Some(location) => parse_config_file(location).map(Some),
        None => Ok(None),
    }
}

/// Create a default configuration file at the specified path
pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).with_file_context(parent)?;
        }
    }

    fs::write(path, include_str!("default_config.toml")).map_err(|e| ScanError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
