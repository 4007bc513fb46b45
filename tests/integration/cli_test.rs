//! Command-line parsing and configuration layering

use clap::Parser;
use std::fs;
use tempfile::tempdir;

use modscan::cli::args::{Args, OutputFormat as CliOutputFormat};
use modscan::config::{self, CliArgs};
use modscan::models::OutputFormat;

use super::support::{create_plugin_directory, MARKER};

#[test]
fn test_args_map_onto_settings() {
    let dir = tempdir().unwrap();
    let args = Args::try_parse_from([
        "modscan",
        "--path",
        dir.path().to_str().unwrap(),
        "--recurse",
        "--no-loaded",
        "--continue-on-error",
        "--marker",
        "Acme.Core",
        "--exclude",
        "Legacy",
        "--exclude",
        "Vendor.dll",
        "--exclude-type",
        "Acme.Internal, Acme",
        "--output",
        "json",
    ])
    .unwrap();
    assert_eq!(args.output, Some(CliOutputFormat::Json));

    let settings = config::load_config_with_env_prefix(CliArgs::from(&args), "MODSCAN_CLI_TEST").unwrap();

    assert_eq!(settings.base_directory, dir.path());
    assert!(settings.recurse_subdirectories);
    assert!(!settings.include_loaded_modules);
    assert!(!settings.throw_on_error);
    assert_eq!(settings.marker_module, "Acme.Core");
    assert_eq!(settings.excluded_modules, vec!["Legacy", "Vendor.dll"]);
    assert_eq!(settings.excluded_types, vec!["Acme.Internal, Acme"]);
    assert_eq!(settings.output_format, OutputFormat::Json);
}

#[test]
fn test_cli_overrides_config_file() {
    let dir = tempdir().unwrap();
    create_plugin_directory(dir.path());
    let config_path = dir.path().join("scan.toml");
    fs::write(
        &config_path,
        format!(
            "base_directory = {:?}\nmarker_module = \"FromFile\"\nthrow_on_error = false\nexcluded_modules = [\"Unrelated\"]\n",
            dir.path().to_str().unwrap()
        ),
    )
    .unwrap();

    let args = Args::try_parse_from([
        "modscan",
        "--config",
        config_path.to_str().unwrap(),
        "--marker",
        MARKER,
    ])
    .unwrap();
    let settings = config::load_config_with_env_prefix(CliArgs::from(&args), "MODSCAN_CLI_TEST").unwrap();

    assert_eq!(settings.base_directory, dir.path());
    assert_eq!(settings.marker_module, MARKER);
    // Flags that were not given leave the file's values alone
    assert!(!settings.throw_on_error);
    assert_eq!(settings.excluded_modules, vec!["Unrelated"]);
}

#[test]
fn test_missing_config_file_is_an_error() {
    let dir = tempdir().unwrap();
    let args = Args::try_parse_from([
        "modscan",
        "--config",
        dir.path().join("absent.toml").to_str().unwrap(),
    ])
    .unwrap();

    let err = config::load_config_with_env_prefix(CliArgs::from(&args), "MODSCAN_CLI_TEST").unwrap_err();
    assert!(matches!(err, modscan::ScanError::ConfigNotFound { .. }));
}

#[test]
fn test_unknown_output_format_is_rejected() {
    assert!(Args::try_parse_from(["modscan", "--output", "xml"]).is_err());
}
