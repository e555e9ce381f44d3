// src/core/report.rs
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::OutputConfig;
use crate::error::Result;
use super::api_method::ApiMethod;

/// One reported method in the JSON index
#[derive(Debug, Clone, Serialize)]
pub struct IndexEntry {
    pub source: PathBuf,
    pub signature: String,
    #[serde(flatten)]
    pub method: ApiMethod,
}

/// One record read back from a report file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportRecord {
    pub class_name: String,
    /// `ret name(T1, T2)`
    pub signature: String,
    /// `None` when the report says `null`
    pub package: Option<String>,
    pub is_public_api: bool,
    /// Body lines, trimmed and joined with `\n`
    pub content: String,
}

impl ReportRecord {
    /// `<pkg.Class: ret name(T1, T2)>`, the method form transfer rules use
    pub fn qualified_method(&self) -> String {
        match &self.package {
            Some(package) => format!("<{}.{}: {}>", package, self.class_name, self.signature),
            None => format!("<{}: {}>", self.class_name, self.signature),
        }
    }
}

/// Parse report text back into records.
///
/// Lines are trimmed and blank ones ignored. A `<Class: signature>` line opens a
/// record, `---` or the next header closes it. Once `Content:` is seen every
/// other line belongs to the body. Headers without exactly one `": "` open
/// nothing, so their lines are dropped until the next valid header.
pub fn parse_report(text: &str) -> Vec<ReportRecord> {
    let mut records = Vec::new();
    let mut current: Option<ReportRecord> = None;
    let mut content: Vec<&str> = Vec::new();
    let mut in_content = false;

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }

        if line.starts_with('<') && line.ends_with('>') {
            finish_record(&mut records, current.take(), &mut content);
            in_content = false;
            current = parse_header(&line[1..line.len() - 1]);
            continue;
        }

        if line == "---" {
            finish_record(&mut records, current.take(), &mut content);
            in_content = false;
            continue;
        }

        let Some(record) = current.as_mut() else {
            continue;
        };

        if in_content {
            content.push(line);
        } else if let Some(package) = line.strip_prefix("Package:") {
            let package = package.trim();
            record.package = (package != "null").then(|| package.to_string());
        } else if let Some(flag) = line.strip_prefix("Is Public API:") {
            record.is_public_api = flag.trim() == "true";
        } else if line.starts_with("Content:") {
            content.clear();
            in_content = true;
        } else {
            content.push(line);
        }
    }

    finish_record(&mut records, current, &mut content);
    records
}

fn parse_header(info: &str) -> Option<ReportRecord> {
    let (class_name, signature) = info.split_once(": ")?;
    if signature.contains(": ") {
        return None;
    }

    Some(ReportRecord {
        class_name: class_name.to_string(),
        signature: signature.to_string(),
        ..ReportRecord::default()
    })
}

fn finish_record(
    records: &mut Vec<ReportRecord>,
    record: Option<ReportRecord>,
    content: &mut Vec<&str>,
) {
    if let Some(mut record) = record {
        record.content = content.join("\n");
        records.push(record);
    }
    content.clear();
}

/// Read and parse one report file
pub async fn read_report<P: AsRef<Path>>(path: P) -> Result<Vec<ReportRecord>> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(parse_report(&text))
}

/// Writes per-file reports and the optional run index
pub struct ReportEmitter {
    output_dir: PathBuf,
    file_prefix: String,
    file_suffix: String,
    index_file: String,
}

impl ReportEmitter {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            output_dir: config.dir.clone(),
            file_prefix: config.file_prefix.clone(),
            file_suffix: config.file_suffix.clone(),
            index_file: config.index_file.clone(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Report path for a source file base name, e.g. `method_details_Foo.txt`
    pub fn report_path(&self, base_name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}{}.{}", self.file_prefix, base_name, self.file_suffix))
    }

    /// Render records in discovery order
    pub fn render(methods: &[ApiMethod]) -> String {
        let mut out = String::new();
        for method in methods {
            out.push_str(&format!("<{}: {}>\n", method.class_name, method.signature()));
            out.push_str(&format!("Package: {}\n", method.package_display()));
            out.push_str(&format!("Is Public API: {}\n", method.is_public_api()));
            out.push_str(&format!("Content:\n{}\n", method.body));
            out.push_str("---\n");
        }
        out
    }

    pub async fn write_report(&self, base_name: &str, methods: &[ApiMethod]) -> Result<PathBuf> {
        let path = self.report_path(base_name);
        tokio::fs::write(&path, Self::render(methods)).await?;
        Ok(path)
    }

    pub async fn write_index(&self, entries: &[IndexEntry]) -> Result<PathBuf> {
        let path = self.output_dir.join(&self.index_file);
        let json = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&path, json).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::api_method::Parameter;
    use tempfile::TempDir;

    fn widget_method() -> ApiMethod {
        ApiMethod {
            class_name: "Foo".to_string(),
            method_name: "make".to_string(),
            return_type: "com.acme.Widget".to_string(),
            parameters: vec![
                Parameter {
                    type_name: "java.lang.String".to_string(),
                    name: "label".to_string(),
                },
                Parameter {
                    type_name: "int".to_string(),
                    name: "size".to_string(),
                },
            ],
            body: "return new Widget();".to_string(),
            package_name: None,
            is_public_class: true,
        }
    }

    #[test]
    fn test_render_record_shape() {
        let rendered = ReportEmitter::render(&[widget_method()]);
        assert_eq!(
            rendered,
            "<Foo: com.acme.Widget make(java.lang.String, int)>\n\
             Package: null\n\
             Is Public API: true\n\
             Content:\n\
             return new Widget();\n\
             ---\n"
        );
    }

    #[test]
    fn test_rendered_report_parses_back() {
        let mut second = widget_method();
        second.method_name = "reset".to_string();
        second.package_name = Some("com.acme".to_string());
        second.body = "count = 0;\n        dirty = false;".to_string();

        let records = parse_report(&ReportEmitter::render(&[widget_method(), second]));
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            ReportRecord {
                class_name: "Foo".to_string(),
                signature: "com.acme.Widget make(java.lang.String, int)".to_string(),
                package: None,
                is_public_api: true,
                content: "return new Widget();".to_string(),
            }
        );
        assert_eq!(records[1].package.as_deref(), Some("com.acme"));
        assert_eq!(records[1].content, "count = 0;\ndirty = false;");
        assert_eq!(
            records[1].qualified_method(),
            "<com.acme.Foo: com.acme.Widget reset(java.lang.String, int)>"
        );
    }

    #[test]
    fn test_parse_report_edge_cases() {
        let text = "stray line\n\
                    <Broken header>\n\
                    Package: lost\n\
                    ---\n\
                    <Foo: void run()>\n\
                    Package: com.acme\n\
                    Is Public API: false\n\
                    Content:\n\
                    Package: not a header here\n\
                    <Bar: int size()>\n\
                    Content:\n";
        let records = parse_report(text);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].class_name, "Foo");
        assert!(!records[0].is_public_api);
        assert_eq!(records[0].package.as_deref(), Some("com.acme"));
        assert_eq!(records[0].content, "Package: not a header here");
        assert_eq!(records[1].signature, "int size()");
        assert_eq!(records[1].content, "");
    }

    #[test]
    fn test_report_path_uses_prefix_and_suffix() {
        let emitter = ReportEmitter::new(&OutputConfig::default());
        assert_eq!(
            emitter.report_path("Foo"),
            PathBuf::from(".").join("method_details_Foo.txt")
        );
    }

    #[tokio::test]
    async fn test_write_report_and_index() {
        let dir = TempDir::new().unwrap();
        let config = OutputConfig {
            dir: dir.path().to_path_buf(),
            ..OutputConfig::default()
        };
        let emitter = ReportEmitter::new(&config);

        let mut second = widget_method();
        second.method_name = "reset".to_string();
        second.package_name = Some("com.acme".to_string());
        let methods = vec![widget_method(), second];

        let path = emitter.write_report("Foo", &methods).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.find("make(").unwrap() < written.find("reset(").unwrap());
        assert!(written.contains("Package: com.acme\n"));
        assert_eq!(written.matches("---\n").count(), 2);
        assert_eq!(read_report(&path).await.unwrap().len(), 2);

        let entries: Vec<IndexEntry> = methods
            .into_iter()
            .map(|method| IndexEntry {
                source: PathBuf::from("lib/Foo.java"),
                signature: method.signature(),
                method,
            })
            .collect();
        let index_path = emitter.write_index(&entries).await.unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(index_path).unwrap()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[0]["method_name"], "make");
        assert_eq!(json[1]["package_name"], "com.acme");
        assert_eq!(json[0]["signature"], "com.acme.Widget make(java.lang.String, int)");
    }
}
