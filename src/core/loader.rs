//! Module loading
//!
//! [`ModuleLoader::resolve`] is the single way the scanner obtains a module handle,
//! whether it starts from a file path or from a reference found in another module.
//! [`ModuleLoader::load_candidate`] runs a discovered file through exclusion,
//! probing and loading, turning every benign outcome into a skip record.

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::aggregator::ResultAggregator;
use crate::core::exclusion::ExclusionFilter;
use crate::core::prober::{ModuleProber, ProbeOutcome};
use crate::core::registry::ModuleRegistry;
use crate::error::{LoadError, Result, ScanError};
use crate::models::{Module, ModuleIdentity, SkipReason, SkippedFile};

/// Where a module handle should come from
#[derive(Debug, Clone, Copy)]
pub enum ModuleSource<'a> {
    /// A module image file
    Path(&'a Path),
    /// A module referenced by another module
    Reference(&'a ModuleIdentity),
}

pub struct ModuleLoader<'r> {
    registry: &'r dyn ModuleRegistry,
}

impl<'r> ModuleLoader<'r> {
    pub fn new(registry: &'r dyn ModuleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r dyn ModuleRegistry {
        self.registry
    }

    /// Resolve a module handle.
    ///
    /// References are tried first as a direct load of the identity, then as a
    /// resident module with the same simple name.
    pub fn resolve(&self, source: ModuleSource<'_>) -> std::result::Result<Arc<Module>, LoadError> {
        match source {
            ModuleSource::Path(path) => self.registry.load_from_path(path),
            ModuleSource::Reference(identity) => match self.registry.load_by_identity(identity) {
                Ok(module) => Ok(module),
                Err(err) => self
                    .registry
                    .resident_modules()
                    .into_iter()
                    .find(|m| m.name() == identity.name)
                    .ok_or(err),
            },
        }
    }

    /// Run a candidate file through exclusion, probing and loading.
    ///
    /// Returns `Ok(None)` when the file was skipped. A load failure is fatal only
    /// when `throw_on_error` is set; otherwise it is recorded and the error flag set.
    pub fn load_candidate(
        &self,
        path: &Path,
        filter: &ExclusionFilter,
        throw_on_error: bool,
        results: &mut ResultAggregator,
    ) -> Result<Option<Arc<Module>>> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();

        if let Some(matched) = filter.check(&file_name) {
            debug!("Excluded {} ({:?})", path.display(), matched);
            results.skip(SkippedFile::new(path, matched.skip_reason()));
            return Ok(None);
        }

        let outcome = ModuleProber::new(self.registry).probe(path);
        if let Some(reason) = outcome.skip_reason() {
            if let ProbeOutcome::InvalidFormat(detail) = &outcome {
                debug!("Skipping {}: {}", path.display(), detail);
            }
            results.skip(SkippedFile::new(path, reason));
            return Ok(None);
        }
        if let ProbeOutcome::Unreadable(err) = outcome {
            return Self::fail(path, err, throw_on_error, results);
        }

        debug!("Loading {}", path.display());
        match self.resolve(ModuleSource::Path(path)) {
            Ok(module) => {
                debug!("{} loaded from {}", module.identity(), path.display());
                Ok(Some(module))
            }
            Err(err) => Self::fail(path, err, throw_on_error, results),
        }
    }

    fn fail(
        path: &Path,
        err: LoadError,
        throw_on_error: bool,
        results: &mut ResultAggregator,
    ) -> Result<Option<Arc<Module>>> {
        results.flag_error();
        if throw_on_error {
            return Err(ScanError::ModuleLoad {
                path: path.to_path_buf(),
                source: err,
            });
        }

        warn!("Could not load {}: {}", path.display(), err);
        results.skip(SkippedFile::new(path, SkipReason::LoadFailure(err.to_string())));
        Ok(None)
    }
}
