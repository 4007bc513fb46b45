//! Type definitions declared by and resolved from modules

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::module::ModuleIdentity;

/// Kind of a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Interface,
    Struct,
    Enum,
    Delegate,
}

impl TypeKind {
    /// Value-like kinds are never candidates for plugin discovery
    pub fn is_value_type(&self) -> bool {
        matches!(self, TypeKind::Struct | TypeKind::Enum)
    }
}

/// A type as declared in a module image's type table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntry {
    /// Namespace-qualified type name
    pub name: String,
    pub kind: TypeKind,
    pub compiler_generated: bool,
    /// Modules that must resolve for this type to load
    pub requires: Vec<ModuleIdentity>,
}

impl TypeEntry {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            compiler_generated: false,
            requires: Vec::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    pub fn value(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Struct)
    }

    pub fn compiler_generated(mut self) -> Self {
        self.compiler_generated = true;
        self
    }

    pub fn requiring(mut self, identity: ModuleIdentity) -> Self {
        self.requires.push(identity);
        self
    }
}

/// A type that resolved successfully. Equality is by declaring module and name.
#[derive(Debug, Clone, Serialize)]
pub struct TypeDefinition {
    pub module: ModuleIdentity,
    pub name: String,
    pub kind: TypeKind,
    pub compiler_generated: bool,
}

impl TypeDefinition {
    pub fn from_entry(module: &ModuleIdentity, entry: &TypeEntry) -> Self {
        Self {
            module: module.clone(),
            name: entry.name.clone(),
            kind: entry.kind,
            compiler_generated: entry.compiler_generated,
        }
    }

    /// `Type.Name, ModuleName`
    pub fn qualified_name(&self) -> String {
        format!("{}, {}", self.name, self.module.name)
    }
}

impl PartialEq for TypeDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.module.key() == other.module.key()
    }
}

impl Eq for TypeDefinition {}

impl Hash for TypeDefinition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.module.key().hash(state);
        self.name.hash(state);
    }
}

/// Why a declared type could not be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeLoadCause {
    /// A module the type depends on could not be loaded
    Dependency { identity: ModuleIdentity, reason: String },
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeLoadFailure {
    pub type_name: String,
    pub cause: TypeLoadCause,
}

/// Outcome of resolving a module's type table: the resolved subset plus any failures
#[derive(Debug, Clone, Default)]
pub struct TypeResolution {
    pub types: Vec<TypeDefinition>,
    pub failures: Vec<TypeLoadFailure>,
}

impl TypeResolution {
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}
