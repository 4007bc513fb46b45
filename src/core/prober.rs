//! Cheap identity probing of candidate files
//!
//! Probing reads only the identity header, so files that are not module images
//! or that belong to the platform runtime never reach the loader.

use std::path::Path;

use crate::core::registry::ModuleRegistry;
use crate::error::LoadError;
use crate::models::{ModuleIdentity, SkipReason};

/// What probing a candidate file found
#[derive(Debug)]
pub enum ProbeOutcome {
    /// A module image that may be loaded
    Eligible(ModuleIdentity),
    /// Not a module image; carries the parser's explanation
    InvalidFormat(String),
    /// A module signed by the platform runtime vendor
    PlatformModule(ModuleIdentity),
    /// The file could not be read at all
    Unreadable(LoadError),
}

impl ProbeOutcome {
    /// Skip reason for outcomes that benignly exclude the file.
    ///
    /// `Unreadable` has none: it is a load failure, not a skip.
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            ProbeOutcome::Eligible(_) | ProbeOutcome::Unreadable(_) => None,
            ProbeOutcome::InvalidFormat(_) => Some(SkipReason::InvalidFormat),
            ProbeOutcome::PlatformModule(_) => Some(SkipReason::PlatformModule),
        }
    }
}

pub struct ModuleProber<'r> {
    registry: &'r dyn ModuleRegistry,
}

impl<'r> ModuleProber<'r> {
    pub fn new(registry: &'r dyn ModuleRegistry) -> Self {
        Self { registry }
    }

    pub fn probe(&self, path: &Path) -> ProbeOutcome {
        match self.registry.inspect(path) {
            Ok(identity) if identity.is_platform() => ProbeOutcome::PlatformModule(identity),
            Ok(identity) => ProbeOutcome::Eligible(identity),
            Err(err) if err.is_invalid_format() => ProbeOutcome::InvalidFormat(err.to_string()),
            Err(err) => ProbeOutcome::Unreadable(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::ProcessRegistry;
    use crate::models::PublicKeyToken;
    use crate::parsers::ModuleImage;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_probe_outcomes() {
        let dir = tempdir().unwrap();
        let plugin = dir.path().join("Billing.dll");
        let runtime = dir.path().join("System.Runtime.dll");
        let text = dir.path().join("notes.dll");

        ModuleImage::new(ModuleIdentity::new("Billing")).write_to(&plugin).unwrap();
        ModuleImage::new(
            ModuleIdentity::new("System.Runtime")
                .with_public_key_token("b03f5f7f11d50a3a".parse::<PublicKeyToken>().unwrap()),
        )
        .write_to(&runtime)
        .unwrap();
        fs::write(&text, "plain text").unwrap();

        let registry = ProcessRegistry::new();
        let prober = ModuleProber::new(&registry);

        assert!(matches!(prober.probe(&plugin), ProbeOutcome::Eligible(id) if id.name == "Billing"));
        assert!(matches!(prober.probe(&runtime), ProbeOutcome::PlatformModule(_)));
        assert_eq!(prober.probe(&text).skip_reason(), Some(SkipReason::InvalidFormat));

        let vanished = prober.probe(&dir.path().join("Vanished.dll"));
        assert!(matches!(vanished, ProbeOutcome::Unreadable(LoadError::Io { .. })));
        assert_eq!(vanished.skip_reason(), None);

        // Probing never makes anything resident
        assert!(registry.is_empty());
    }
}
