//! Module image file format
//!
//! A module image is laid out as
//!
//! ```text
//! magic "\x7fMOD" | format version (u16, little endian) | header | body
//! ```
//!
//! The header holds only the module identity so that probing a file never has to
//! decode the rest of it. The body holds the ordered reference list and the type
//! table. Both sections are bincode-encoded with fixed-width integers and a size limit.

use bincode::Options;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::{LoadError, Result, ScanError};
use crate::models::{Module, ModuleIdentity, ModuleOrigin, TypeEntry};

/// Leading bytes of every module image
pub const MAGIC: [u8; 4] = *b"\x7fMOD";

/// Newest format version this host can load
pub const FORMAT_VERSION: u16 = 1;

/// File extensions that may hold a module image
pub const MODULE_EXTENSIONS: [&str; 4] = ["dll", "exe", "so", "dylib"];

const MAX_SECTION_BYTES: u64 = 16 * 1024 * 1024;

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .with_limit(MAX_SECTION_BYTES)
}

/// Whether a path carries one of the known module extensions
pub fn has_module_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MODULE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// In-memory form of a module image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleImage {
    pub identity: ModuleIdentity,
    pub references: Vec<ModuleIdentity>,
    pub types: Vec<TypeEntry>,
}

impl ModuleImage {
    pub fn new(identity: ModuleIdentity) -> Self {
        Self {
            identity,
            references: Vec::new(),
            types: Vec::new(),
        }
    }

    pub fn with_reference(mut self, identity: ModuleIdentity) -> Self {
        self.references.push(identity);
        self
    }

    pub fn with_type(mut self, entry: TypeEntry) -> Self {
        self.types.push(entry);
        self
    }

    /// Encode with the current format version
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.encode_as(FORMAT_VERSION)
    }

    /// Encode stamped with an explicit format version
    pub fn encode_as(&self, format_version: u16) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(256);
        bytes.extend_from_slice(&MAGIC);
        bytes.extend_from_slice(&format_version.to_le_bytes());
        codec().serialize_into(&mut bytes, &self.identity)?;
        codec().serialize_into(&mut bytes, &(&self.references, &self.types))?;
        Ok(bytes)
    }

    /// Encode and write the image to `path`
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.encode()?;
        std::fs::write(path, bytes).map_err(|e| ScanError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Turn the image into a loaded module backed by `path`
    pub fn into_module(self, path: PathBuf) -> Module {
        Module::new(self.identity, ModuleOrigin::File(path))
            .with_references(self.references)
            .with_types(self.types)
    }
}

fn open(path: &Path) -> std::result::Result<BufReader<File>, LoadError> {
    File::open(path).map(BufReader::new).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn invalid_format(path: &Path, message: impl Into<String>) -> LoadError {
    LoadError::InvalidFormat {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

/// Read magic and format version
fn read_preamble<R: Read>(reader: &mut R, path: &Path) -> std::result::Result<u16, LoadError> {
    let mut magic = [0u8; 4];
    let mut version = [0u8; 2];

    for buf in [&mut magic[..], &mut version[..]] {
        reader.read_exact(buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => invalid_format(path, "file is too short"),
            _ => LoadError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
    }

    if magic != MAGIC {
        return Err(invalid_format(path, "missing module image signature"));
    }

    Ok(u16::from_le_bytes(version))
}

fn read_identity<R: Read>(reader: &mut R, path: &Path) -> std::result::Result<ModuleIdentity, LoadError> {
    codec()
        .deserialize_from(reader)
        .map_err(|e| invalid_format(path, format!("unreadable module header: {}", e)))
}

/// Read only the identity header of a module image
pub fn read_header(path: &Path) -> std::result::Result<ModuleIdentity, LoadError> {
    let mut reader = open(path)?;
    read_preamble(&mut reader, path)?;
    read_identity(&mut reader, path)
}

/// Read and fully decode a module image
pub fn read_image(path: &Path) -> std::result::Result<ModuleImage, LoadError> {
    let mut reader = open(path)?;
    let version = read_preamble(&mut reader, path)?;
    if version == 0 || version > FORMAT_VERSION {
        return Err(LoadError::Incompatible {
            path: path.to_path_buf(),
            found: version,
            supported: FORMAT_VERSION,
        });
    }

    let identity = read_identity(&mut reader, path)?;
    let (references, types): (Vec<ModuleIdentity>, Vec<TypeEntry>) = codec()
        .deserialize_from(&mut reader)
        .map_err(|e| LoadError::Corrupt {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok(ModuleImage {
        identity,
        references,
        types,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModuleVersion;
    use std::fs;
    use tempfile::tempdir;

    fn sample_image() -> ModuleImage {
        ModuleImage::new(ModuleIdentity::new("Billing").with_version(ModuleVersion::new(2, 1, 0, 0)))
            .with_reference(ModuleIdentity::new("Host.Core"))
            .with_type(TypeEntry::class("Billing.InvoiceHandler").requiring(ModuleIdentity::new("Host.Core")))
            .with_type(TypeEntry::value("Billing.Money"))
    }

    #[test]
    fn test_read_image_returns_written_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Billing.dll");
        sample_image().write_to(&path).unwrap();

        let image = read_image(&path).unwrap();
        assert_eq!(image, sample_image());
    }

    #[test]
    fn test_header_is_readable_without_body() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Billing.dll");
        let bytes = sample_image().encode().unwrap();
        // Keep the header, cut the body short
        let header_len = 6 + codec().serialized_size(&sample_image().identity).unwrap() as usize;
        fs::write(&path, &bytes[..header_len + 3]).unwrap();

        let identity = read_header(&path).unwrap();
        assert_eq!(identity.name, "Billing");

        let err = read_image(&path).unwrap_err();
        assert!(matches!(err, LoadError::Corrupt { .. }), "got {:?}", err);
    }

    #[test]
    fn test_text_file_is_invalid_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.dll");
        fs::write(&path, "These are release notes, not a module.").unwrap();

        assert!(read_header(&path).unwrap_err().is_invalid_format());
        assert!(read_image(&path).unwrap_err().is_invalid_format());
    }

    #[test]
    fn test_empty_file_is_invalid_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.dll");
        fs::write(&path, b"").unwrap();

        assert!(read_header(&path).unwrap_err().is_invalid_format());
    }

    #[test]
    fn test_newer_format_is_incompatible_but_probeable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Future.dll");
        fs::write(&path, sample_image().encode_as(FORMAT_VERSION + 1).unwrap()).unwrap();

        assert_eq!(read_header(&path).unwrap().name, "Billing");
        match read_image(&path).unwrap_err() {
            LoadError::Incompatible { found, supported, .. } => {
                assert_eq!(found, FORMAT_VERSION + 1);
                assert_eq!(supported, FORMAT_VERSION);
            }
            other => panic!("Expected Incompatible, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = read_header(&dir.path().join("absent.dll")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_module_extensions() {
        assert!(has_module_extension(Path::new("a/Billing.dll")));
        assert!(has_module_extension(Path::new("a/Billing.DLL")));
        assert!(has_module_extension(Path::new("a/libbilling.so")));
        assert!(!has_module_extension(Path::new("a/Billing.pdb")));
        assert!(!has_module_extension(Path::new("a/Makefile")));
    }
}
