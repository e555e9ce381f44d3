use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::{GenericSplit, HeuristicsConfig, ScanConfig};
use crate::error::{ApiScanError, Result};
use super::api_method::{ApiMethod, Parameter};
use super::eligibility;
use super::languages::{JavaParser, LanguageParser};
use super::qualifier::TypeQualifier;
use super::source_unit::SourceUnit;

/// Analysis result for one source file
#[derive(Debug, Clone)]
pub struct ParsedFile {
    /// Path as discovered under the root
    pub path: PathBuf,

    /// File name with the source extension removed; doubles as the class name
    pub base_name: String,

    /// Package, imports and class visibility
    pub unit: SourceUnit,

    /// Every declaration that survived the safety check, in source order
    pub methods: Vec<ApiMethod>,

    /// Declarations dropped as unsafe to qualify
    pub skipped: usize,
}

impl ParsedFile {
    pub fn public_api(&self) -> impl Iterator<Item = &ApiMethod> {
        self.methods.iter().filter(|m| m.is_public_api())
    }
}

/// Discovers source files and turns their text into qualified method records
pub struct CodeParser {
    extension: String,
    generic_split: GenericSplit,
    language_parser: Box<dyn LanguageParser>,
}

impl CodeParser {
    pub fn new(scan: &ScanConfig, heuristics: &HeuristicsConfig) -> Result<Self> {
        let language_parser: Box<dyn LanguageParser> =
            Box::new(JavaParser::new(heuristics.body_mode)?);

        if !language_parser
            .file_extensions()
            .contains(&scan.extension.as_str())
        {
            return Err(ApiScanError::Config(format!(
                "No scanner available for .{} files",
                scan.extension
            )));
        }

        Ok(Self {
            extension: scan.extension.clone(),
            generic_split: heuristics.generic_split,
            language_parser,
        })
    }

    pub fn language_name(&self) -> &str {
        self.language_parser.language_name()
    }

    /// List candidate files under `root`, sorted by name within each directory
    pub fn discover<P: AsRef<Path>>(&self, root: P) -> Vec<PathBuf> {
        let suffix = format!(".{}", self.extension);
        let mut files = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping entry: {}", ApiScanError::FileSystem(e.to_string()));
                    continue;
                }
            };

            // Symlinks are not followed into directories, but a link to a file counts
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink()
                    && std::fs::metadata(entry.path()).is_ok_and(|m| m.is_file()));

            if is_file && entry.file_name().to_string_lossy().ends_with(&suffix) {
                files.push(entry.into_path());
            }
        }

        files
    }

    /// Read and analyze a single source file
    pub async fn parse_file<P: AsRef<Path>>(&self, file_path: P) -> Result<ParsedFile> {
        let path = file_path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let content = String::from_utf8_lossy(&bytes);
        Ok(self.analyze_source(path, &content))
    }

    /// Pure per-file analysis: metadata, scanning, safety gate, qualification
    pub fn analyze_source(&self, path: &Path, content: &str) -> ParsedFile {
        let base_name = base_name(path, &self.extension);
        let unit = self.language_parser.extract_unit(content);
        let imports = unit.import_table();
        let qualifier =
            TypeQualifier::new(unit.package_name.as_deref(), &imports, self.generic_split);

        debug!(
            "{}: package {:?}, {} imports, public class: {}",
            path.display(),
            unit.package_name,
            imports.len(),
            unit.is_public_class
        );

        let mut methods = Vec::new();
        let mut skipped = 0;

        for decl in self.language_parser.scan_declarations(content) {
            if let Some(reason) = eligibility::skip_reason(&decl) {
                debug!("{}: skipping {} ({})", path.display(), decl.method_name, reason);
                skipped += 1;
                continue;
            }

            let parameters = decl
                .parameter_tokens()
                .into_iter()
                .map(|(type_name, name)| Parameter {
                    type_name: qualifier.qualify(type_name),
                    name: name.to_string(),
                })
                .collect();

            methods.push(ApiMethod {
                class_name: base_name.clone(),
                method_name: decl.method_name.clone(),
                return_type: qualifier.qualify(&decl.return_type),
                parameters,
                body: decl.body,
                package_name: unit.package_name.clone(),
                is_public_class: unit.is_public_class,
            });
        }

        ParsedFile {
            path: path.to_path_buf(),
            base_name,
            unit,
            methods,
            skipped,
        }
    }
}

/// File name with every `.{extension}` occurrence removed
pub fn base_name(path: &Path, extension: &str) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .replace(&format!(".{}", extension), "")
}
