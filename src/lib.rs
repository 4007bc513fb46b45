//! modscan - plugin module discovery for extensible hosts
//!
//! Given a directory of module images, modscan finds the modules that reference the
//! host's core ("marker") module, directly or through other modules, and collects
//! the reference types they declare. Files that are not module images, platform
//! runtime modules and excluded modules are skipped and reported.
//!
//! ```no_run
//! use modscan::{ModuleScanner, ScanSettings};
//!
//! let settings = ScanSettings::for_directory("./plugins");
//! let result = ModuleScanner::with_process_registry(settings).scan()?;
//! for ty in &result.types {
//!     println!("{}", ty.qualified_name());
//! }
//! # Ok::<(), modscan::ScanError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod output;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{ModuleRegistry, ModuleScanner, ProcessRegistry};
pub use error::{handle_error, ErrorSeverity, LoadError, Result, ResultExt, ScanError};
pub use models::{
    config::ScanSettings, Module, ModuleIdentity, ScanResult, SkipReason, SkippedFile, TypeDefinition,
};
pub use parsers::ModuleImage;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
