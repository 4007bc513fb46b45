//! Settings validation

use std::path::Path;

use crate::error::{Result, ScanError};
use crate::models::config::ScanSettings;

/// Settings validator for ensuring configuration is valid
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate settings and return errors if invalid
    pub fn validate(settings: &ScanSettings) -> Result<()> {
        if !settings.base_directory.is_dir() {
            return Err(ScanError::InvalidPath {
                path: settings.base_directory.clone(),
            });
        }

        if settings.marker_module.trim().is_empty() {
            return Err(ScanError::config_error("Marker module name must not be empty"));
        }

        if settings.excluded_modules.iter().any(|name| name.trim().is_empty()) {
            return Err(ScanError::config_error("Excluded module names must not be empty"));
        }

        if settings.excluded_types.iter().any(|name| name.trim().is_empty()) {
            return Err(ScanError::config_error("Excluded type names must not be empty"));
        }

        if let Some(path) = &settings.output_file {
            Self::validate_output_path(path)?;
        }

        Ok(())
    }

    /// Validate that the output file's directory exists and is writable
    fn validate_output_path(path: &Path) -> Result<()> {
        let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent,
            None => return Ok(()),
        };

        if !parent.exists() {
            return Err(ScanError::OutputDirectoryNotFound {
                path: parent.to_path_buf(),
            });
        }

        let metadata = std::fs::metadata(parent).map_err(ScanError::io_error)?;
        if metadata.permissions().readonly() {
            return Err(ScanError::permission_denied(parent));
        }

        Ok(())
    }
}
