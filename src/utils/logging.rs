//! Logging initialization
//!
//! Logs go to stderr so that reports written to stdout stay machine-readable.
//! `RUST_LOG` always takes precedence over the configured filter.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor a configured filter is present
pub fn default_filter(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "modscan=debug"
    } else {
        "info"
    }
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed, which happens when the
/// host application configured tracing itself.
pub fn init_logging(filter: Option<&str>, verbose: bool, quiet: bool, use_colors: bool) -> bool {
    let env_filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::new(filter.unwrap_or_else(|| default_filter(verbose, quiet))),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .with_ansi(use_colors && std::env::var("NO_COLOR").is_err()),
        )
        .with(env_filter)
        .try_init()
        .is_ok()
}
