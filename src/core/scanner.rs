//! Scan orchestration
//!
//! A scan first considers modules already resident in the process, then loads every
//! candidate file, then decides relevance for each loaded module and extracts types
//! from the relevant ones. All state except the registry lives for one call.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::core::aggregator::ResultAggregator;
use crate::core::enumerator::ModuleFileEnumerator;
use crate::core::exclusion::ExclusionFilter;
use crate::core::extractor::TypeExtractor;
use crate::core::loader::ModuleLoader;
use crate::core::registry::{ModuleRegistry, ProcessRegistry};
use crate::core::resolver::ReferenceResolver;
use crate::error::{Result, ScanError};
use crate::models::{config::ScanSettings, Module, ModuleIdentity, ScanResult};

/// Finds the modules that reference the marker module and the types they declare
pub struct ModuleScanner {
    settings: ScanSettings,
    registry: Arc<dyn ModuleRegistry>,
}

/// Per-scan collaborators borrowed from the scanner
struct ScanContext<'a> {
    loader: &'a ModuleLoader<'a>,
    filter: &'a ExclusionFilter,
    extractor: TypeExtractor<'a>,
}

impl ModuleScanner {
    pub fn new(settings: ScanSettings, registry: Arc<dyn ModuleRegistry>) -> Self {
        Self { settings, registry }
    }

    /// Scanner backed by a fresh [`ProcessRegistry`] that probes the base directory
    pub fn with_process_registry(settings: ScanSettings) -> Self {
        let registry = ProcessRegistry::new().with_probing_path(settings.base_directory.clone());
        Self::new(settings, Arc::new(registry))
    }

    pub fn settings(&self) -> &ScanSettings {
        &self.settings
    }

    pub fn registry(&self) -> &Arc<dyn ModuleRegistry> {
        &self.registry
    }

    /// Run a full scan of resident modules, the base directory and any additional paths
    pub fn scan(&self) -> Result<ScanResult> {
        let start_time = Instant::now();
        let filter = ExclusionFilter::new(&self.settings.excluded_modules);
        let loader = ModuleLoader::new(self.registry.as_ref());
        let context = self.context(&loader, &filter);
        let mut resolver = ReferenceResolver::new(&self.settings.marker_module, &filter, &loader);
        let mut results = ResultAggregator::new();

        if self.settings.include_loaded_modules {
            let resident = self.registry.resident_modules();
            debug!("Scanning {} resident modules", resident.len());
            for module in resident {
                self.scan_loaded(&module, &context, &mut resolver, &mut results)?;
            }
        }

        info!(
            "Scanning modules in {} (recurse={})",
            self.settings.base_directory.display(),
            self.settings.recurse_subdirectories
        );

        let mut candidates = ModuleFileEnumerator::new(
            &self.settings.base_directory,
            self.settings.recurse_subdirectories,
        )
        .enumerate()?;
        candidates.extend(self.additional_candidates());

        let mut loaded = Vec::new();
        for path in &candidates {
            if let Some(module) =
                context
                    .loader
                    .load_candidate(path, context.filter, self.settings.throw_on_error, &mut results)?
            {
                loaded.push(module);
            }
        }

        for module in &loaded {
            self.scan_loaded(module, &context, &mut resolver, &mut results)?;
        }

        let result = results.finish();
        info!(
            "Scan finished in {:.2?}: {} modules, {} types, {} skipped files{}",
            start_time.elapsed(),
            result.modules.len(),
            result.types.len(),
            result.skipped_files.len(),
            if result.errors_occurred { ", with errors" } else { "" }
        );

        Ok(result)
    }

    /// Scan only `module`: no directory walk and no resident module sweep
    pub fn scan_module(&self, module: &Arc<Module>) -> Result<ScanResult> {
        let filter = ExclusionFilter::new(&self.settings.excluded_modules);
        let loader = ModuleLoader::new(self.registry.as_ref());
        let context = self.context(&loader, &filter);
        let mut resolver = ReferenceResolver::new(&self.settings.marker_module, &filter, &loader);
        let mut results = ResultAggregator::new();

        self.scan_loaded(module, &context, &mut resolver, &mut results)?;

        Ok(results.finish())
    }

    fn context<'a>(&'a self, loader: &'a ModuleLoader<'a>, filter: &'a ExclusionFilter) -> ScanContext<'a> {
        ScanContext {
            loader,
            filter,
            extractor: TypeExtractor::new(self.registry.as_ref(), self.settings.excluded_types.iter().cloned()),
        }
    }

    fn additional_candidates(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.settings.additional_paths.iter().filter_map(|path| {
            if path.is_file() {
                Some(path.clone())
            } else {
                debug!("Ignoring additional path {}: not a file", path.display());
                None
            }
        })
    }

    fn scan_loaded(
        &self,
        module: &Arc<Module>,
        context: &ScanContext<'_>,
        resolver: &mut ReferenceResolver<'_>,
        results: &mut ResultAggregator,
    ) -> Result<()> {
        if !resolver.references_marker(module) {
            debug!("{} does not reference {}", module.name(), self.settings.marker_module);
            return Ok(());
        }

        self.add_types_to_result(module, context, &resolver.marker_identity(), results)
    }

    fn add_types_to_result(
        &self,
        module: &Arc<Module>,
        context: &ScanContext<'_>,
        marker: &ModuleIdentity,
        results: &mut ResultAggregator,
    ) -> Result<()> {
        let extraction = context.extractor.extract(module, marker);

        if let Some(diagnostic) = extraction.diagnostic {
            results.flag_error();
            if self.settings.throw_on_error {
                return Err(ScanError::TypeLoad {
                    module: module.identity().full_name(),
                    message: diagnostic,
                });
            }
            warn!("{}", diagnostic);
        }

        debug!("{} contributes {} types", module.name(), extraction.types.len());
        results.add_types(extraction.types);
        results.add_module(Arc::clone(module));

        Ok(())
    }
}
