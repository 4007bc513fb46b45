//! Shared utilities

pub mod logging;

pub use logging::{default_filter, init_logging};
