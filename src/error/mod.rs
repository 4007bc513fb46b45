//! Error handling for modscan
//!
//! This module provides the error types, result alias and error context utilities
//! used throughout the scanner, configuration and output layers.

pub mod context;
pub mod types;

pub use context::{handle_error, ResultExt};
pub use types::{ErrorSeverity, LoadError, Result, ScanError};
