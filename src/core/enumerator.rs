//! Candidate file enumeration
//!
//! Walks the base directory and lists files with a module extension. No content is
//! inspected here; only an inaccessible root is an error.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{handle_error, Result, ResultExt, ScanError};
use crate::parsers::module_image::has_module_extension;

/// Lists candidate module files below a root directory
#[derive(Debug, Clone)]
pub struct ModuleFileEnumerator {
    root: PathBuf,
    recurse: bool,
}

impl ModuleFileEnumerator {
    pub fn new(root: impl Into<PathBuf>, recurse: bool) -> Self {
        Self {
            root: root.into(),
            recurse,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Candidate files in file-name order within each directory
    pub fn enumerate(&self) -> Result<Vec<PathBuf>> {
        let metadata = fs::metadata(&self.root).with_file_context(&self.root)?;
        if !metadata.is_dir() {
            return Err(ScanError::InvalidPath {
                path: self.root.clone(),
            });
        }

        let max_depth = if self.recurse { usize::MAX } else { 1 };
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
            .sort_by_file_name();

        let mut candidates = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    let permission_denied = err
                        .io_error()
                        .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied);
                    return Err(if permission_denied {
                        ScanError::permission_denied(&self.root)
                    } else {
                        ScanError::directory_traversal_error(&self.root, err.to_string())
                    });
                }
                Err(err) => {
                    // Below the root, unreadable entries are logged and skipped
                    let path = err.path().unwrap_or(&self.root).to_path_buf();
                    let permission_denied = err
                        .io_error()
                        .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied);
                    let skipped = if permission_denied {
                        ScanError::permission_denied(&path)
                    } else {
                        ScanError::directory_traversal_error(&path, err.to_string())
                    };
                    if let Some(critical) = handle_error(skipped) {
                        return Err(critical);
                    }
                    continue;
                }
            };

            let path = entry.path();
            let is_file = entry.file_type().is_file() || (entry.path_is_symlink() && path.is_file());
            if is_file && has_module_extension(path) {
                candidates.push(path.to_path_buf());
            }
        }

        debug!(
            "Found {} candidate files in {} (recurse={})",
            candidates.len(),
            self.root.display(),
            self.recurse
        );

        Ok(candidates)
    }
}
