//! Parsing functionality for module files
//!
//! This module provides the module image codec used by the file-backed registry
//! to probe identity headers and load full images.

pub mod module_image;

pub use module_image::{has_module_extension, read_header, read_image, ModuleImage, FORMAT_VERSION, MAGIC, MODULE_EXTENSIONS};
