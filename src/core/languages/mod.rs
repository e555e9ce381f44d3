//! Language-specific scanners
//!
//! Each language gets its own module with a consistent interface for pulling
//! file metadata and candidate method declarations out of raw source text.

mod java;

pub use java::JavaParser;

use super::api_method::RawDeclaration;
use super::source_unit::SourceUnit;

/// Trait that all language scanners must implement
pub trait LanguageParser: Send + Sync {
    /// Extract package, imports and class visibility from source text
    fn extract_unit(&self, content: &str) -> SourceUnit;

    /// Find candidate method declarations in source order
    fn scan_declarations(&self, content: &str) -> Vec<RawDeclaration>;

    /// Get the file extensions this scanner handles
    fn file_extensions(&self) -> &[&str];

    /// Get the language name
    fn language_name(&self) -> &str;
}
