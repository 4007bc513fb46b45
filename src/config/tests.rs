//! Tests for configuration system

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::models::config::{OutputFormat, PartialScanSettings, DEFAULT_MARKER_MODULE};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_partial_settings_merge() {
        let mut base = PartialScanSettings {
            base_directory: Some(PathBuf::from("/base/plugins")),
            excluded_modules: Some(vec!["base_exclude".to_string()]),
            ..Default::default()
        };

        let override_settings = PartialScanSettings {
            base_directory: Some(PathBuf::from("/override/plugins")),
            recurse_subdirectories: Some(true),
            ..Default::default()
        };

        base.merge_from(override_settings);

        assert_eq!(base.base_directory, Some(PathBuf::from("/override/plugins")));
        assert_eq!(base.excluded_modules, Some(vec!["base_exclude".to_string()]));
        assert_eq!(base.recurse_subdirectories, Some(true));
    }

    #[test]
    fn test_partial_settings_to_settings() {
        let partial = PartialScanSettings {
            base_directory: Some(PathBuf::from("/custom/plugins")),
            output_format: Some(OutputFormat::Json),
            throw_on_error: Some(false),
            ..Default::default()
        };

        let settings = partial.to_settings();

        assert_eq!(settings.base_directory, PathBuf::from("/custom/plugins"));
        assert_eq!(settings.output_format, OutputFormat::Json);
        assert!(!settings.throw_on_error);

        // Unspecified fields fall back to defaults
        assert!(settings.include_loaded_modules);
        assert!(!settings.recurse_subdirectories);
        assert_eq!(settings.marker_module, DEFAULT_MARKER_MODULE);
    }

    #[test]
    fn test_config_builder() {
        let dir = tempdir().unwrap();

        let first = PartialScanSettings {
            base_directory: Some(PathBuf::from("/does/not/matter")),
            excluded_modules: Some(vec!["first".to_string()]),
            ..Default::default()
        };

        let second = PartialScanSettings {
            base_directory: Some(dir.path().to_path_buf()),
            marker_module: Some("Acme.Core".to_string()),
            ..Default::default()
        };

        let settings = ConfigBuilder::new().merge(first).merge(second).build().unwrap();

        assert_eq!(settings.base_directory, dir.path());
        assert_eq!(settings.excluded_modules, vec!["first".to_string()]);
        assert_eq!(settings.marker_module, "Acme.Core");
    }

    #[test]
    fn test_builder_rejects_missing_base_directory() {
        let dir = tempdir().unwrap();
        let partial = PartialScanSettings {
            base_directory: Some(dir.path().join("absent")),
            ..Default::default()
        };

        let err = ConfigBuilder::new().merge(partial).build().unwrap_err();
        assert!(matches!(err, crate::error::ScanError::InvalidPath { .. }));
    }

    #[test]
    fn test_file_config_source() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("modscan.toml");

        let config_content = r#"
            base_directory = "/srv/plugins"
            recurse_subdirectories = true
            excluded_types = ["Acme.Internal"]
            additional_paths = ["/opt/shared/Extra.dll"]
            output_format = "csv"
        "#;

        fs::write(&config_path, config_content).unwrap();

        let file_config = file::FileConfig::with_path(&config_path);
        assert!(file_config.is_available());
        assert_eq!(file_config.priority(), 20);

        let partial = file_config.load().unwrap();

        assert_eq!(partial.base_directory, Some(PathBuf::from("/srv/plugins")));
        assert_eq!(partial.recurse_subdirectories, Some(true));
        assert_eq!(partial.excluded_types, Some(vec!["Acme.Internal".to_string()]));
        assert_eq!(partial.additional_paths, Some(vec![PathBuf::from("/opt/shared/Extra.dll")]));
        assert_eq!(partial.output_format, Some(OutputFormat::Csv));
    }

    #[test]
    fn test_file_config_not_found() {
        let file_config = file::FileConfig::with_path("/nonexistent/path/config.toml");
        assert!(!file_config.is_available());
        assert!(file_config.load().is_err());
    }

    #[test]
    fn test_env_config_source() {
        std::env::set_var("MODSCANTEST_BASE_DIRECTORY", "/env/plugins");
        std::env::set_var("MODSCANTEST_EXCLUDE", "nlog, Legacy.dll ,tools");
        std::env::set_var("MODSCANTEST_THROW_ON_ERROR", "false");
        std::env::set_var("MODSCANTEST_OUTPUT_FORMAT", "json");

        let env_config = file::EnvConfig::new("MODSCANTEST");
        assert!(env_config.is_available());
        assert_eq!(env_config.priority(), 10);

        let partial = env_config.load().unwrap();

        std::env::remove_var("MODSCANTEST_BASE_DIRECTORY");
        std::env::remove_var("MODSCANTEST_EXCLUDE");
        std::env::remove_var("MODSCANTEST_THROW_ON_ERROR");
        std::env::remove_var("MODSCANTEST_OUTPUT_FORMAT");

        assert_eq!(partial.base_directory, Some(PathBuf::from("/env/plugins")));
        assert_eq!(
            partial.excluded_modules,
            Some(vec!["nlog".to_string(), "Legacy.dll".to_string(), "tools".to_string()])
        );
        assert_eq!(partial.throw_on_error, Some(false));
        assert_eq!(partial.output_format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_env_config_rejects_bad_boolean() {
        std::env::set_var("MODSCANBAD_RECURSE", "sometimes");
        let result = file::EnvConfig::new("MODSCANBAD").load();
        std::env::remove_var("MODSCANBAD_RECURSE");

        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_fails_on_malformed_env() {
        let dir = tempdir().unwrap();
        std::env::set_var("MODSCANMALFORMED_MARKER", "Acme.Core");
        std::env::set_var("MODSCANMALFORMED_RECURSE", "maybe");

        let args = CliArgs {
            path: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let result = load_config_with_env_prefix(args, "MODSCANMALFORMED");

        std::env::remove_var("MODSCANMALFORMED_MARKER");
        std::env::remove_var("MODSCANMALFORMED_RECURSE");

        // One bad variable must not silently drop the others
        assert!(matches!(result, Err(crate::error::ScanError::Config { .. })));
    }

    #[test]
    fn test_env_config_unavailable_without_variables() {
        let env_config = file::EnvConfig::new("MODSCAN_UNSET_PREFIX");
        assert!(!env_config.is_available());
    }

    #[test]
    fn test_load_config_precedence() {
        let dir = tempdir().unwrap();
        let plugins = dir.path().join("plugins");
        fs::create_dir(&plugins).unwrap();

        let config_path = dir.path().join("modscan.toml");
        fs::write(
            &config_path,
            format!(
                "base_directory = {:?}\nmarker_module = \"From.File\"\nthrow_on_error = true\n",
                plugins.display().to_string()
            ),
        )
        .unwrap();

        let args = CliArgs {
            config: Some(config_path),
            marker: Some("From.Cli".to_string()),
            continue_on_error: true,
            ..Default::default()
        };

        let settings = load_config_with_env_prefix(args, "MODSCAN_PRECEDENCE_TEST").unwrap();

        assert_eq!(settings.base_directory, plugins);
        assert_eq!(settings.marker_module, "From.Cli");
        assert!(!settings.throw_on_error);
    }

    #[test]
    fn test_load_config_missing_explicit_file() {
        let args = CliArgs {
            config: Some(PathBuf::from("/nonexistent/modscan.toml")),
            ..Default::default()
        };

        let err = load_config_with_env_prefix(args, "MODSCAN_MISSING_TEST").unwrap_err();
        assert!(matches!(err, crate::error::ScanError::ConfigNotFound { .. }));
    }
}
