//! Core scanning functionality: discovery, loading, relevance and type extraction

pub mod aggregator;
pub mod enumerator;
pub mod exclusion;
pub mod extractor;
pub mod loader;
pub mod prober;
pub mod registry;
pub mod resolver;
pub mod scanner;

pub use aggregator::ResultAggregator;
pub use enumerator::ModuleFileEnumerator;
pub use exclusion::{normalize_module_name, ExclusionFilter, ExclusionMatch, DEFAULT_EXCLUSIONS};
pub use extractor::{format_type_load_failure, Extraction, TypeExtractor};
pub use loader::{ModuleLoader, ModuleSource};
pub use prober::{ModuleProber, ProbeOutcome};
pub use registry::{ModuleRegistry, ProcessRegistry};
pub use resolver::{ReferenceResolver, RelevanceMemo};
pub use scanner::ModuleScanner;
