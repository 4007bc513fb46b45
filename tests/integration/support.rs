//! Shared fixtures: plugin directories built from module images

use std::fs;
use std::path::{Path, PathBuf};

use modscan::models::TypeEntry;
use modscan::{ModuleIdentity, ModuleImage, ScanSettings};

pub const MARKER: &str = "Host.Core";

/// Write `name.dll` into `dir`, referencing `references` and declaring one class per entry in `types`
pub fn write_module(dir: &Path, name: &str, references: &[&str], types: &[&str]) -> PathBuf {
    let mut image = ModuleImage::new(ModuleIdentity::new(name));
    for reference in references {
        image = image.with_reference(ModuleIdentity::new(*reference));
    }
    for ty in types {
        image = image.with_type(TypeEntry::class(*ty));
    }

    let path = dir.join(format!("{}.dll", name));
    image.write_to(&path).unwrap();
    path
}

/// Write a file with a module extension that is not a module image
pub fn write_garbage(dir: &Path, file_name: &str) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, "this is not a module image\n").unwrap();
    path
}

/// The marker, one transitive plugin chain and one unrelated module
pub fn create_plugin_directory(dir: &Path) {
    write_module(dir, MARKER, &[], &["Host.Core.IHandler"]);
    write_module(dir, "File2", &[MARKER], &["File2.Middleware"]);
    write_module(dir, "File1", &["File2"], &["File1.Handler", "File1.Options"]);
    write_module(dir, "Unrelated", &[], &["Unrelated.Thing"]);
}

/// Settings for an isolated scan of `dir`
pub fn settings(dir: &Path) -> ScanSettings {
    ScanSettings {
        marker_module: MARKER.to_string(),
        include_loaded_modules: false,
        ..ScanSettings::for_directory(dir)
    }
}
