//! Full runs through the command layer, from arguments to a written report

use std::fs;
use tempfile::tempdir;

use modscan::cli::commands::{EXIT_CLEAN, EXIT_ERRORS_OCCURRED, EXIT_FATAL};
use modscan::cli::{Args, Command};
use modscan::cli::args::OutputFormat;
use modscan::{ModuleIdentity, ModuleImage};

use super::support::{create_plugin_directory, write_garbage, MARKER};

fn scan_args(dir: &std::path::Path, output: OutputFormat, report: &str) -> Args {
    Args {
        path: Some(dir.to_path_buf()),
        marker: Some(MARKER.to_string()),
        no_loaded: true,
        no_colors: true,
        quiet: true,
        output: Some(output),
        output_file: Some(dir.join(report)),
        ..Default::default()
    }
}

#[test]
fn test_json_report() {
    let dir = tempdir().unwrap();
    create_plugin_directory(dir.path());
    write_garbage(dir.path(), "notes.dll");

    let code = Command::from_args(scan_args(dir.path(), OutputFormat::Json, "report.json")).run();
    assert_eq!(code, EXIT_CLEAN);

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("report.json")).unwrap()).unwrap();
    assert_eq!(report["marker_module"], MARKER);
    assert_eq!(report["errors_occurred"], false);
    assert_eq!(report["modules"].as_array().unwrap().len(), 3);

    let types: Vec<&str> = report["types"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert!(types.contains(&"File1.Handler"));
    assert!(!types.contains(&"Unrelated.Thing"));

    let skipped = report["skipped_files"].as_array().unwrap();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0]["reason"]["kind"], "invalid_format");
}

#[test]
fn test_csv_report() {
    let dir = tempdir().unwrap();
    create_plugin_directory(dir.path());

    let code = Command::from_args(scan_args(dir.path(), OutputFormat::Csv, "report.csv")).run();
    assert_eq!(code, EXIT_CLEAN);

    let csv = fs::read_to_string(dir.path().join("report.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert!(lines[0].starts_with("Type,Kind,Module"));
    // One row per relevant type
    assert_eq!(lines.len(), 1 + 4);
    assert!(lines.iter().any(|line| line.starts_with("File2.Middleware,class,File2,")));
}

#[test]
fn test_load_failure_exit_codes() {
    let dir = tempdir().unwrap();
    create_plugin_directory(dir.path());
    let broken = ModuleImage::new(ModuleIdentity::new("Broken"))
        .encode_as(modscan::parsers::FORMAT_VERSION + 1)
        .unwrap();
    fs::write(dir.path().join("Broken.dll"), broken).unwrap();

    let strict = scan_args(dir.path(), OutputFormat::Text, "strict.txt");
    assert_eq!(Command::from_args(strict).run(), EXIT_FATAL);
    assert!(!dir.path().join("strict.txt").exists());

    let lenient = Args {
        continue_on_error: true,
        ..scan_args(dir.path(), OutputFormat::Json, "lenient.json")
    };
    assert_eq!(Command::from_args(lenient).run(), EXIT_ERRORS_OCCURRED);

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("lenient.json")).unwrap()).unwrap();
    assert_eq!(report["errors_occurred"], true);
    assert_eq!(report["modules"].as_array().unwrap().len(), 3);
    assert_eq!(report["skipped_files"][0]["reason"]["kind"], "load_failure");
}
