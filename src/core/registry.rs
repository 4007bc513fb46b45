//! Process module registry
//!
//! The scanner never holds process-wide state itself. Everything it knows about
//! loaded modules comes through a [`ModuleRegistry`], which the host injects.
//! [`ProcessRegistry`] is the file-backed implementation used by the CLI: it reads
//! module images from disk, keeps loaded modules resident for the life of the
//! registry, and resolves by-identity loads by probing a set of directories.

use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::LoadError;
use crate::models::{
    Module, ModuleIdentity, TypeDefinition, TypeLoadCause, TypeLoadFailure, TypeResolution,
};
use crate::parsers::module_image::{self, MODULE_EXTENSIONS};

/// Capabilities the scanner needs from the host's module registry
pub trait ModuleRegistry: Send + Sync {
    /// Read a module file's identity without loading it
    fn inspect(&self, path: &Path) -> Result<ModuleIdentity, LoadError>;

    /// Load a module file; the module stays resident afterwards
    fn load_from_path(&self, path: &Path) -> Result<Arc<Module>, LoadError>;

    /// Load a module by identity, from the resident set or the registry's probing locations
    fn load_by_identity(&self, identity: &ModuleIdentity) -> Result<Arc<Module>, LoadError>;

    /// Modules resident at call time
    fn resident_modules(&self) -> Vec<Arc<Module>>;

    /// Resolve a module's declared types, keeping whatever resolves
    fn resolve_types(&self, module: &Module) -> TypeResolution;
}

/// File-backed registry of resident modules
#[derive(Debug, Default)]
pub struct ProcessRegistry {
    probing_paths: Vec<PathBuf>,
    modules: RwLock<Vec<Arc<Module>>>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory searched by [`ModuleRegistry::load_by_identity`]
    pub fn with_probing_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.probing_paths.push(dir.into());
        self
    }

    /// Make a module resident, as the host does for modules it loaded itself.
    /// Returns the already resident module if one with the same identity exists.
    pub fn register(&self, module: Module) -> Arc<Module> {
        self.admit(module)
    }

    pub fn len(&self) -> usize {
        self.modules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.read().is_empty()
    }

    fn admit(&self, module: Module) -> Arc<Module> {
        let key = module.identity().key();
        let mut modules = self.modules.write();
        if let Some(existing) = modules.iter().find(|m| m.identity().key() == key) {
            return Arc::clone(existing);
        }

        let module = Arc::new(module);
        modules.push(Arc::clone(&module));
        module
    }

    fn find_by_path(&self, path: &Path) -> Option<Arc<Module>> {
        self.modules
            .read()
            .iter()
            .find(|m| m.path() == Some(path))
            .cloned()
    }

    fn find_by_name(&self, name: &str) -> Option<Arc<Module>> {
        self.modules
            .read()
            .iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Signed requests with a version bind exactly; anything else binds by name
    fn bind(requested: &ModuleIdentity, module: Arc<Module>) -> Result<Arc<Module>, LoadError> {
        let found = module.identity();
        let exact = requested.is_signed() && requested.version.is_some();
        if exact
            && (found.version != requested.version || found.public_key_token != requested.public_key_token)
        {
            return Err(LoadError::VersionMismatch {
                requested: requested.full_name(),
                found: found.full_name(),
            });
        }
        Ok(module)
    }
}

impl ModuleRegistry for ProcessRegistry {
    fn inspect(&self, path: &Path) -> Result<ModuleIdentity, LoadError> {
        module_image::read_header(path)
    }

    fn load_from_path(&self, path: &Path) -> Result<Arc<Module>, LoadError> {
        if let Some(module) = self.find_by_path(path) {
            return Ok(module);
        }

        let image = module_image::read_image(path)?;
        Ok(self.admit(image.into_module(path.to_path_buf())))
    }

    fn load_by_identity(&self, identity: &ModuleIdentity) -> Result<Arc<Module>, LoadError> {
        if let Some(module) = self.find_by_name(&identity.name) {
            return Self::bind(identity, module);
        }

        for dir in &self.probing_paths {
            for ext in MODULE_EXTENSIONS {
                let candidate = dir.join(format!("{}.{}", identity.name, ext));
                if !candidate.is_file() {
                    continue;
                }
                let module = self.load_from_path(&candidate)?;
                if module.name().eq_ignore_ascii_case(&identity.name) {
                    return Self::bind(identity, module);
                }
            }
        }

        Err(LoadError::NotFound {
            name: identity.name.clone(),
        })
    }

    fn resident_modules(&self) -> Vec<Arc<Module>> {
        self.modules.read().clone()
    }

    fn resolve_types(&self, module: &Module) -> TypeResolution {
        let mut resolution = TypeResolution::default();

        for (index, entry) in module.types().iter().enumerate() {
            if entry.name.trim().is_empty() {
                resolution.failures.push(TypeLoadFailure {
                    type_name: format!("#{}", index),
                    cause: TypeLoadCause::Other(format!("Type entry #{} in '{}' has no name", index, module.name())),
                });
                continue;
            }

            let missing = entry
                .requires
                .iter()
                .filter(|required| !required.name.eq_ignore_ascii_case(module.name()))
                .find_map(|required| {
                    self.load_by_identity(required)
                        .err()
                        .map(|err| (required, err))
                });

            match missing {
                Some((required, err)) => resolution.failures.push(TypeLoadFailure {
                    type_name: entry.name.clone(),
                    cause: TypeLoadCause::Dependency {
                        identity: required.clone(),
                        reason: err.to_string(),
                    },
                }),
                None => resolution
                    .types
                    .push(TypeDefinition::from_entry(module.identity(), entry)),
            }
        }

        resolution
    }
}
