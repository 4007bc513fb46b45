//! Scan result accumulation and deduplication

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::models::{Module, ScanResult, SkippedFile, TypeDefinition};

/// Builds a [`ScanResult`] incrementally over one scan
#[derive(Debug, Default)]
pub struct ResultAggregator {
    result: ScanResult,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_module(&mut self, module: Arc<Module>) {
        self.result.modules.push(module);
    }

    pub fn add_types(&mut self, types: impl IntoIterator<Item = TypeDefinition>) {
        self.result.types.extend(types);
    }

    pub fn skip(&mut self, skipped: SkippedFile) {
        self.result.skipped_files.push(skipped);
    }

    /// Record that a warning-level failure happened
    pub fn flag_error(&mut self) {
        self.result.errors_occurred = true;
    }

    pub fn errors_occurred(&self) -> bool {
        self.result.errors_occurred
    }

    /// Deduplicate and hand out the final result.
    ///
    /// Modules dedup by identity, types by declaring module and name, skip records by
    /// path. A path that ended up loaded is never also reported as skipped.
    pub fn finish(self) -> ScanResult {
        let mut result = self.result;

        let mut seen_modules = HashSet::new();
        result
            .modules
            .retain(|module| seen_modules.insert(module.identity().key()));

        let mut seen_types = HashSet::new();
        result.types.retain(|ty| seen_types.insert(ty.clone()));

        let loaded_paths: HashSet<PathBuf> = result
            .modules
            .iter()
            .filter_map(|m| m.path().map(|p| p.to_path_buf()))
            .collect();
        let mut seen_skips = HashSet::new();
        result.skipped_files.retain(|skipped| {
            !loaded_paths.contains(skipped.path()) && seen_skips.insert(skipped.path().to_path_buf())
        });

        result
    }
}
