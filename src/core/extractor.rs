//! Type extraction from relevant modules

use std::collections::HashSet;
use tracing::trace;

use crate::core::registry::ModuleRegistry;
use crate::models::{Module, ModuleIdentity, TypeDefinition, TypeLoadCause, TypeLoadFailure};

/// Types kept from one module plus the diagnostic for a partial resolution
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub types: Vec<TypeDefinition>,
    pub diagnostic: Option<String>,
}

impl Extraction {
    pub fn is_partial(&self) -> bool {
        self.diagnostic.is_some()
    }
}

pub struct TypeExtractor<'r> {
    registry: &'r dyn ModuleRegistry,
    excluded_types: HashSet<String>,
}

impl<'r> TypeExtractor<'r> {
    pub fn new<I, S>(registry: &'r dyn ModuleRegistry, excluded_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            registry,
            excluded_types: excluded_types.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolve and filter the declared types of `module`.
    ///
    /// `marker` is used only to recognise failures caused by a mismatched marker version.
    pub fn extract(&self, module: &Module, marker: &ModuleIdentity) -> Extraction {
        let resolution = self.registry.resolve_types(module);

        let types = resolution
            .types
            .into_iter()
            .filter(|ty| self.is_allowed(ty))
            .collect();

        let diagnostic = if resolution.failures.is_empty() {
            None
        } else {
            Some(format_type_load_failure(module.identity(), &resolution.failures, marker))
        };

        Extraction { types, diagnostic }
    }

    fn is_allowed(&self, ty: &TypeDefinition) -> bool {
        if ty.kind.is_value_type() || ty.compiler_generated {
            return false;
        }

        if self.excluded_types.contains(&ty.name) || self.excluded_types.contains(&ty.qualified_name()) {
            trace!("Type {} excluded", ty.qualified_name());
            return false;
        }

        true
    }
}

fn is_marker_request(requested: &ModuleIdentity, marker: &ModuleIdentity) -> bool {
    if requested.name != marker.name || requested.culture_name() != marker.culture_name() {
        return false;
    }

    match &marker.public_key_token {
        Some(token) => requested.public_key_token.as_ref() == Some(token),
        None => true,
    }
}

/// Human-readable explanation of a partial type resolution
pub fn format_type_load_failure(
    module: &ModuleIdentity,
    failures: &[TypeLoadFailure],
    marker: &ModuleIdentity,
) -> String {
    let mut generic = Vec::new();
    let mut dependencies: Vec<&str> = Vec::new();
    let mut marker_mismatch = false;

    for failure in failures {
        match &failure.cause {
            TypeLoadCause::Dependency { identity, .. } if is_marker_request(identity, marker) => {
                marker_mismatch = true;
            }
            TypeLoadCause::Dependency { identity, .. } => {
                if !dependencies.contains(&identity.name.as_str()) {
                    dependencies.push(identity.name.as_str());
                }
            }
            TypeLoadCause::Other(message) => generic.push(format!("{}: {}", failure.type_name, message)),
        }
    }

    let mut out = format!("Could not enumerate all types for '{}'.", module.full_name());

    if !generic.is_empty() {
        out.push_str("\nExceptions:");
        for line in &generic {
            out.push('\n');
            out.push_str(line);
        }
    }

    if !dependencies.is_empty() {
        out.push_str("\n\nThe following modules required by its types could not be loaded:");
        for name in &dependencies {
            out.push('\n');
            out.push_str(name);
        }
    }

    if marker_mismatch {
        let found = marker
            .version
            .map(|v| v.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        out.push_str(&format!(
            "\n\nThe module references a version of '{}' that differs from the one found ({}). \
             Rebuild it against '{}' version {}.",
            marker.name, found, marker.name, found
        ));
    }

    out
}
