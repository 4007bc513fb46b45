//! Reference graph relevance resolution
//!
//! A module is relevant when its reference graph reaches the marker module. The
//! search is a depth-first walk memoized per identity. Before a module's references
//! are examined its memo entry is set to `false`, so a cycle that leads back to it
//! sees `false` and stops. The entry is promoted to `true` as soon as any reference
//! turns out to be relevant.

use std::collections::HashMap;
use tracing::trace;

use crate::core::exclusion::ExclusionFilter;
use crate::core::loader::{ModuleLoader, ModuleSource};
use crate::models::{Module, ModuleIdentity};

/// Relevance per module identity for one scan. Absent means not yet visited.
#[derive(Debug, Default)]
pub struct RelevanceMemo {
    entries: HashMap<String, bool>,
}

impl RelevanceMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, identity: &ModuleIdentity) -> Option<bool> {
        self.entries.get(&identity.key()).copied()
    }

    pub fn record(&mut self, identity: &ModuleIdentity, relevant: bool) {
        self.entries.insert(identity.key(), relevant);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decides whether modules transitively reference the marker module
pub struct ReferenceResolver<'a> {
    marker: &'a str,
    filter: &'a ExclusionFilter,
    loader: &'a ModuleLoader<'a>,
    memo: RelevanceMemo,
    marker_identity: Option<ModuleIdentity>,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(marker: &'a str, filter: &'a ExclusionFilter, loader: &'a ModuleLoader<'a>) -> Self {
        Self {
            marker,
            filter,
            loader,
            memo: RelevanceMemo::new(),
            marker_identity: None,
        }
    }

    /// Whether `module` is the marker or reaches it through its references
    pub fn references_marker(&mut self, module: &Module) -> bool {
        let identity = module.identity();
        if let Some(relevant) = self.memo.get(identity) {
            return relevant;
        }

        self.memo.record(identity, false);

        if self.is_marker(module) {
            self.memo.record(identity, true);
            if self.marker_identity.is_none() {
                self.marker_identity = Some(identity.clone());
            }
        }

        if self.should_scan_dependencies(module) {
            for reference in module.references() {
                let referenced = match self.loader.resolve(ModuleSource::Reference(reference)) {
                    Ok(referenced) => referenced,
                    Err(err) => {
                        trace!("{} references unresolved {}: {}", module.name(), reference.name, err);
                        continue;
                    }
                };

                if self.references_marker(&referenced) {
                    self.memo.record(identity, true);
                    break;
                }
            }
        }

        self.memo.get(identity).unwrap_or(false)
    }

    fn is_marker(&self, module: &Module) -> bool {
        module.name() == self.marker
    }

    fn should_scan_dependencies(&self, module: &Module) -> bool {
        if module.is_dynamic() {
            return false;
        }

        if self.is_marker(module) {
            return false;
        }

        if module.identity().is_platform() {
            return false;
        }

        !self.filter.is_excluded(module.name())
    }

    /// Identity of the marker as encountered during this scan, or a bare identity
    /// carrying only the configured name when it has not been reached yet
    pub fn marker_identity(&self) -> ModuleIdentity {
        self.marker_identity
            .clone()
            .unwrap_or_else(|| ModuleIdentity::new(self.marker))
    }

    pub fn memo(&self) -> &RelevanceMemo {
        &self.memo
    }
}
