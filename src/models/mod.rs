//! Data models and structures for modscan

pub mod config;
pub mod module;
pub mod scan;
pub mod types;

pub use config::{OutputFormat, PartialScanSettings, ScanSettings};
pub use module::{Module, ModuleIdentity, ModuleOrigin, ModuleVersion, PublicKeyToken};
pub use scan::{ScanResult, SkipReason, SkippedFile};
pub use types::{TypeDefinition, TypeEntry, TypeKind, TypeLoadCause, TypeLoadFailure, TypeResolution};
