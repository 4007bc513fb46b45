//! Name-based module exclusion
//!
//! Names are compared after normalization: lower-cased, with one trailing module
//! extension removed. Matching is exact on the normalized form, so `Foo.DLL`,
//! `foo.dll` and `foo` all match an entry `foo`, while `foobar` does not.

use std::collections::HashSet;

use crate::models::SkipReason;
use crate::parsers::module_image::MODULE_EXTENSIONS;

/// Well-known third-party, test and tooling modules that never host plugins
pub const DEFAULT_EXCLUSIONS: [&str; 13] = [
    // Test frameworks
    "nunit",
    "nunit.framework",
    "nunit.applicationdomain",
    "xunit.core",
    "xunit.assert",
    // Third-party libraries
    "nlog",
    "newtonsoft.json",
    "common.logging",
    "nhibernate",
    "raven.client",
    "raven.abstractions",
    // The launcher ships next to plugins for convenience but must not be scanned
    "Host.Launcher.exe",
    "Microsoft.WindowsAzure",
];

/// Which list excluded a name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionMatch {
    /// Caller-supplied exclusion list
    Explicit,
    /// Built-in [`DEFAULT_EXCLUSIONS`]
    Default,
}

impl ExclusionMatch {
    pub fn skip_reason(self) -> SkipReason {
        match self {
            ExclusionMatch::Explicit => SkipReason::ExplicitlyExcluded,
            ExclusionMatch::Default => SkipReason::ExcludedByDefault,
        }
    }
}

/// Lower-case a module or file name and strip one known module extension
pub fn normalize_module_name(name: &str) -> String {
    let lower = name.to_lowercase();
    for ext in MODULE_EXTENSIONS {
        if let Some(stem) = lower.strip_suffix(ext).and_then(|s| s.strip_suffix('.')) {
            return stem.to_string();
        }
    }
    lower
}

/// Allow/deny decision for candidate files and referenced modules
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    explicit: HashSet<String>,
    defaults: HashSet<String>,
}

impl ExclusionFilter {
    /// Build a filter from the caller's exclusion list plus the built-in defaults
    pub fn new<I, S>(explicit: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            explicit: explicit
                .into_iter()
                .map(|name| normalize_module_name(name.as_ref()))
                .collect(),
            defaults: DEFAULT_EXCLUSIONS
                .iter()
                .map(|name| normalize_module_name(name))
                .collect(),
        }
    }

    /// Explicit entries win over defaults when both match
    pub fn check(&self, name: &str) -> Option<ExclusionMatch> {
        let normalized = normalize_module_name(name);
        if self.explicit.contains(&normalized) {
            Some(ExclusionMatch::Explicit)
        } else if self.defaults.contains(&normalized) {
            Some(ExclusionMatch::Default)
        } else {
            None
        }
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.check(name).is_some()
    }
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>())
    }
}
