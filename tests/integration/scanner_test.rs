//! Scanner behavior against plugin directories on disk

use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

use modscan::models::{ModuleOrigin, PublicKeyToken, TypeEntry};
use modscan::{
    Module, ModuleIdentity, ModuleImage, ModuleScanner, ProcessRegistry, ScanError, SkipReason,
};

use super::support::{create_plugin_directory, settings, write_garbage, write_module, MARKER};

#[test]
fn test_transitive_references_are_found() {
    let dir = tempdir().unwrap();
    create_plugin_directory(dir.path());

    let result = ModuleScanner::with_process_registry(settings(dir.path())).scan().unwrap();

    let mut names: Vec<&str> = result.modules.iter().map(|m| m.name()).collect();
    names.sort();
    assert_eq!(names, vec!["File1", "File2", MARKER]);
    assert!(result.contains_type("File1.Handler"));
    assert!(result.contains_type("File1.Options"));
    assert!(result.contains_type("File2.Middleware"));
    assert!(!result.contains_type("Unrelated.Thing"));
    assert!(result.skipped_files.is_empty());
    assert!(!result.errors_occurred);
}

#[test]
fn test_platform_module_is_skipped_without_error() {
    let dir = tempdir().unwrap();
    create_plugin_directory(dir.path());
    let runtime = dir.path().join("System.Runtime.dll");
    ModuleImage::new(
        ModuleIdentity::new("System.Runtime")
            .with_public_key_token("b03f5f7f11d50a3a".parse::<PublicKeyToken>().unwrap()),
    )
    .write_to(&runtime)
    .unwrap();

    let result = ModuleScanner::with_process_registry(settings(dir.path())).scan().unwrap();

    assert_eq!(result.skipped_files.len(), 1);
    assert_eq!(result.skipped(&runtime).unwrap().reason(), &SkipReason::PlatformModule);
    assert!(result.module("System.Runtime").is_none());
    assert!(!result.errors_occurred);
    assert_eq!(result.modules.len(), 3);
}

#[test]
fn test_non_module_file_is_skipped_without_error() {
    let dir = tempdir().unwrap();
    create_plugin_directory(dir.path());
    let readme = write_garbage(dir.path(), "readme.dll");

    let result = ModuleScanner::with_process_registry(settings(dir.path())).scan().unwrap();

    let skipped = result.skipped(&readme).expect("readme.dll should be reported");
    assert_eq!(skipped.reason(), &SkipReason::InvalidFormat);
    assert!(!result.errors_occurred);
    assert_eq!(result.modules.len(), 3);
}

#[test]
fn test_incompatible_module_fails_the_scan() {
    let dir = tempdir().unwrap();
    create_plugin_directory(dir.path());
    let bytes = ModuleImage::new(ModuleIdentity::new("Future"))
        .encode_as(modscan::parsers::module_image::FORMAT_VERSION + 1)
        .unwrap();
    fs::write(dir.path().join("Future.dll"), bytes).unwrap();

    let err = ModuleScanner::with_process_registry(settings(dir.path())).scan().unwrap_err();

    assert!(matches!(err, ScanError::ModuleLoad { .. }));
}

#[test]
fn test_incompatible_module_is_recorded_when_lenient() {
    let dir = tempdir().unwrap();
    create_plugin_directory(dir.path());
    let bytes = ModuleImage::new(ModuleIdentity::new("Future"))
        .encode_as(modscan::parsers::module_image::FORMAT_VERSION + 1)
        .unwrap();
    let future = dir.path().join("Future.dll");
    fs::write(&future, bytes).unwrap();

    let lenient = modscan::ScanSettings {
        throw_on_error: false,
        ..settings(dir.path())
    };
    let result = ModuleScanner::with_process_registry(lenient).scan().unwrap();

    assert!(result.errors_occurred);
    assert!(result.skipped(&future).unwrap().reason().is_error());
    assert!(result.module("File1").is_some());
}

#[test]
fn test_resident_module_is_not_duplicated() {
    let dir = tempdir().unwrap();
    create_plugin_directory(dir.path());

    let registry = Arc::new(ProcessRegistry::new().with_probing_path(dir.path()));
    registry.register(
        Module::new(ModuleIdentity::new("File2"), ModuleOrigin::InProcess)
            .with_references([ModuleIdentity::new(MARKER)])
            .with_types([TypeEntry::class("File2.Middleware")]),
    );

    let scan_settings = modscan::ScanSettings {
        include_loaded_modules: true,
        ..settings(dir.path())
    };
    let result = ModuleScanner::new(scan_settings, registry).scan().unwrap();

    assert_eq!(result.modules.iter().filter(|m| m.name() == "File2").count(), 1);
    assert_eq!(result.types_from("File2").count(), 1);
    assert!(result.module("File1").is_some());
}

#[test]
fn test_exclusion_ignores_case_and_extension() {
    let dir = tempdir().unwrap();
    create_plugin_directory(dir.path());
    let excluded = write_module(dir.path(), "Vendor.Tools", &[MARKER], &["Vendor.Tools.Helper"]);

    let scan_settings = modscan::ScanSettings {
        excluded_modules: vec!["VENDOR.TOOLS.DLL".to_string()],
        ..settings(dir.path())
    };
    let result = ModuleScanner::with_process_registry(scan_settings).scan().unwrap();

    assert!(result.module("Vendor.Tools").is_none());
    assert!(!result.contains_type("Vendor.Tools.Helper"));
    assert_eq!(
        result.skipped(&excluded).unwrap().reason(),
        &SkipReason::ExplicitlyExcluded
    );
}

#[test]
fn test_excluded_module_does_not_bridge_references() {
    let dir = tempdir().unwrap();
    write_module(dir.path(), MARKER, &[], &[]);
    write_module(dir.path(), "Bridge", &[MARKER], &["Bridge.Adapter"]);
    write_module(dir.path(), "Consumer", &["Bridge"], &["Consumer.Handler"]);

    let scan_settings = modscan::ScanSettings {
        excluded_modules: vec!["bridge".to_string()],
        ..settings(dir.path())
    };
    let result = ModuleScanner::with_process_registry(scan_settings).scan().unwrap();

    assert!(result.module("Bridge").is_none());
    assert!(result.module("Consumer").is_none());
}

#[test]
fn test_reference_cycles_terminate() {
    let dir = tempdir().unwrap();
    write_module(dir.path(), MARKER, &[], &[]);
    write_module(dir.path(), "Ping", &["Pong"], &["Ping.Handler"]);
    write_module(dir.path(), "Pong", &["Ping", MARKER], &["Pong.Handler"]);
    write_module(dir.path(), "Loop", &["Loop"], &["Loop.Handler"]);

    let result = ModuleScanner::with_process_registry(settings(dir.path())).scan().unwrap();

    assert!(result.module("Ping").is_some());
    assert!(result.module("Pong").is_some());
    assert!(result.module("Loop").is_none());
}

#[test]
fn test_excluded_types_are_filtered() {
    let dir = tempdir().unwrap();
    create_plugin_directory(dir.path());

    let scan_settings = modscan::ScanSettings {
        excluded_types: vec!["File1.Options".to_string()],
        ..settings(dir.path())
    };
    let result = ModuleScanner::with_process_registry(scan_settings).scan().unwrap();

    assert!(result.contains_type("File1.Handler"));
    assert!(!result.contains_type("File1.Options"));
}
