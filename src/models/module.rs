//! Module identity and loaded module structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::types::TypeEntry;

/// Vendor signature tokens of modules shipped with the platform runtime itself.
/// Such modules are never loaded for scanning and never reference a marker.
pub const PLATFORM_PUBLIC_KEY_TOKENS: [[u8; 8]; 6] = [
    [0xb7, 0x7a, 0x5c, 0x56, 0x19, 0x34, 0xe0, 0x89],
    [0x7c, 0xec, 0x85, 0xd7, 0xbe, 0xa7, 0x79, 0x8e],
    [0xb0, 0x3f, 0x5f, 0x7f, 0x11, 0xd5, 0x0a, 0x3a],
    [0x31, 0xbf, 0x38, 0x56, 0xad, 0x36, 0x4e, 0x35],
    [0xcc, 0x7b, 0x13, 0xff, 0xcd, 0x2d, 0xdd, 0x51],
    [0xad, 0xb9, 0x79, 0x38, 0x29, 0xdd, 0xae, 0x60],
];

/// 8-byte strong signature token identifying the vendor of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKeyToken(pub [u8; 8]);

impl PublicKeyToken {
    /// Whether this token belongs to the platform runtime vendor set
    pub fn is_platform(&self) -> bool {
        PLATFORM_PUBLIC_KEY_TOKENS.contains(&self.0)
    }
}

impl fmt::Display for PublicKeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for PublicKeyToken {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| format!("Invalid public key token '{}': {}", s, e))?;
        let token: [u8; 8] = bytes
            .try_into()
            .map_err(|_| format!("Public key token '{}' must be 8 bytes", s))?;
        Ok(PublicKeyToken(token))
    }
}

/// Four-part module version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleVersion {
    pub major: u16,
    pub minor: u16,
    pub build: u16,
    pub revision: u16,
}

impl ModuleVersion {
    pub fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.major, self.minor, self.build, self.revision)
    }
}

impl FromStr for ModuleVersion {
    type Err = String;

    /// Parses one to four dot-separated parts; missing parts are zero
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.is_empty() || parts.len() > 4 {
            return Err(format!("Invalid module version: {}", s));
        }

        let mut numbers = [0u16; 4];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| format!("Invalid module version: {}", s))?;
        }

        Ok(ModuleVersion::new(numbers[0], numbers[1], numbers[2], numbers[3]))
    }
}

/// Identity of a module: simple name plus optional version, culture and signature
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleIdentity {
    pub name: String,
    pub version: Option<ModuleVersion>,
    /// `None` means culture-neutral
    pub culture: Option<String>,
    pub public_key_token: Option<PublicKeyToken>,
}

impl ModuleIdentity {
    /// Create an unversioned, culture-neutral, unsigned identity
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            culture: None,
            public_key_token: None,
        }
    }

    pub fn with_version(mut self, version: ModuleVersion) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_culture(mut self, culture: impl Into<String>) -> Self {
        self.culture = Some(culture.into());
        self
    }

    pub fn with_public_key_token(mut self, token: PublicKeyToken) -> Self {
        self.public_key_token = Some(token);
        self
    }

    /// Culture name, `neutral` when none is set
    pub fn culture_name(&self) -> &str {
        self.culture.as_deref().unwrap_or("neutral")
    }

    /// Strongly signed modules carry a vendor token
    pub fn is_signed(&self) -> bool {
        self.public_key_token.is_some()
    }

    /// Whether the identity carries one of the platform runtime vendor tokens
    pub fn is_platform(&self) -> bool {
        self.public_key_token.is_some_and(|token| token.is_platform())
    }

    /// Fully qualified display name, e.g.
    /// `Billing, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null`
    pub fn full_name(&self) -> String {
        let version = self.version.unwrap_or_default();
        let token = self
            .public_key_token
            .map(|t| t.to_string())
            .unwrap_or_else(|| "null".to_string());
        format!(
            "{}, Version={}, Culture={}, PublicKeyToken={}",
            self.name,
            version,
            self.culture_name(),
            token
        )
    }

    /// Case-insensitive key used for memoization and deduplication
    pub fn key(&self) -> String {
        self.full_name().to_lowercase()
    }
}

impl fmt::Display for ModuleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

/// Where a loaded module came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleOrigin {
    /// Loaded from a module image file
    File(PathBuf),
    /// Already resident in the process, no backing file known
    InProcess,
}

/// A module loaded into the process registry. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Module {
    identity: ModuleIdentity,
    origin: ModuleOrigin,
    dynamic: bool,
    references: Vec<ModuleIdentity>,
    types: Vec<TypeEntry>,
}

impl Module {
    pub fn new(identity: ModuleIdentity, origin: ModuleOrigin) -> Self {
        Self {
            identity,
            origin,
            dynamic: false,
            references: Vec::new(),
            types: Vec::new(),
        }
    }

    /// A module generated at runtime; never file-backed
    pub fn dynamic(identity: ModuleIdentity) -> Self {
        Self {
            dynamic: true,
            ..Self::new(identity, ModuleOrigin::InProcess)
        }
    }

    pub fn with_references(mut self, references: impl IntoIterator<Item = ModuleIdentity>) -> Self {
        self.references.extend(references);
        self
    }

    pub fn with_types(mut self, types: impl IntoIterator<Item = TypeEntry>) -> Self {
        self.types.extend(types);
        self
    }

    pub fn identity(&self) -> &ModuleIdentity {
        &self.identity
    }

    /// Simple name of the module
    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn origin(&self) -> &ModuleOrigin {
        &self.origin
    }

    /// Backing file, if the module was loaded from disk
    pub fn path(&self) -> Option<&Path> {
        match &self.origin {
            ModuleOrigin::File(path) => Some(path),
            ModuleOrigin::InProcess => None,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Outbound references in declaration order
    pub fn references(&self) -> &[ModuleIdentity] {
        &self.references
    }

    /// Declared type table
    pub fn types(&self) -> &[TypeEntry] {
        &self.types
    }
}
