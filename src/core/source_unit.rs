// src/core/source_unit.rs
use std::collections::HashMap;

/// Text-level metadata extracted from one source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceUnit {
    /// Declared package, absent for the default package
    pub package_name: Option<String>,

    /// Imported names in source order, duplicates removed
    pub imports: Vec<String>,

    /// Whether the file declares a `public class`
    pub is_public_class: bool,
}

impl SourceUnit {
    pub fn import_table(&self) -> ImportTable {
        ImportTable::from_imports(&self.imports)
    }
}

/// Simple name to fully-qualified name lookup built from a file's imports
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    entries: HashMap<String, String>,
}

impl ImportTable {
    /// Keys are the text after the last `.`; a later import replaces an
    /// earlier one with the same simple name.
    pub fn from_imports<S: AsRef<str>>(imports: &[S]) -> Self {
        let mut entries = HashMap::new();
        for import in imports {
            let import = import.as_ref();
            let simple_name = match import.rfind('.') {
                Some(idx) => &import[idx + 1..],
                None => import,
            };
            entries.insert(simple_name.to_string(), import.to_string());
        }
        Self { entries }
    }

    pub fn resolve(&self, simple_name: &str) -> Option<&str> {
        self.entries.get(simple_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
