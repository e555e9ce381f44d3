// src/core/rules.rs
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::config::RulesConfig;
use crate::error::{ApiScanError, Result};

/// Data flow between two positions of a call: `base`, `result` or an argument index
#[derive(Debug, Clone, Deserialize)]
pub struct TransferRule {
    /// `<pkg.Class: ret name(T1, T2)>`
    pub method: String,
    pub from: Value,
    pub to: Value,
}

impl TransferRule {
    /// Comma-separated items inside the first `(...)` of the method, 0 when empty
    pub fn param_count(&self) -> usize {
        let Some(open) = self.method.find('(') else {
            return 0;
        };
        let rest = &self.method[open + 1..];
        match rest.find(')') {
            Some(0) | None => 0,
            Some(close) => rest[..close].split(',').count(),
        }
    }

    /// The YAML flow mapping for this rule, or `None` when an end is out of range
    pub fn yaml_line(&self) -> Option<String> {
        let count = self.param_count();
        let from = endpoint(&self.from).filter(|e| is_valid_endpoint(e, count))?;
        let to = endpoint(&self.to).filter(|e| is_valid_endpoint(e, count))?;

        Some(format!(
            "- {{ method: \"{}\", from: {}, to: {} }}\n",
            self.method.replace(">>", ">"),
            from,
            to
        ))
    }
}

/// Endpoint text as written in the rule; strings verbatim, non-negative integers in decimal
fn endpoint(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => n.as_u64().map(|n| n.to_string()),
        _ => None,
    }
}

fn is_valid_endpoint(endpoint: &str, param_count: usize) -> bool {
    match endpoint {
        "base" | "result" => true,
        digits if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            digits.parse::<usize>().is_ok_and(|idx| idx < param_count)
        }
        _ => false,
    }
}

/// Counters for one export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub files_read: usize,
    pub rules_read: usize,
    pub rules_exported: usize,
    pub failures: usize,
}

/// Collects rule files from one directory into a single YAML list
pub struct RuleExporter {
    dir: PathBuf,
    file_prefix: String,
    output: PathBuf,
}

impl RuleExporter {
    pub fn new(config: &RulesConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            file_prefix: config.file_prefix.clone(),
            output: config.dir.join(&config.output_file),
        }
    }

    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = output;
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// `{prefix}*.json` files directly inside the rule directory, sorted by name
    pub fn discover(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping entry: {}", ApiScanError::FileSystem(e.to_string()));
                    continue;
                }
            };

            let is_rule_file = {
                let name = entry.file_name().to_string_lossy();
                name.starts_with(&self.file_prefix) && name.ends_with(".json")
            };

            if is_rule_file && entry.path().is_file() {
                files.push(entry.into_path());
            }
        }

        files
    }

    pub async fn load(path: &Path) -> Result<Vec<TransferRule>> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Read every rule file, keep the rules whose ends are in range and write the YAML output
    pub async fn export(&self) -> Result<ExportSummary> {
        let files = self.discover();
        if files.is_empty() {
            return Err(ApiScanError::NoRuleFiles(self.dir.clone()));
        }
        info!("Found {} transfer rule files in {}", files.len(), self.dir.display());

        let mut summary = ExportSummary::default();
        let mut yaml = String::new();

        for path in &files {
            let rules = match Self::load(path).await {
                Ok(rules) => rules,
                Err(e) => {
                    error!("Failed to read {}: {}", path.display(), e);
                    summary.failures += 1;
                    continue;
                }
            };
            summary.files_read += 1;
            debug!("{}: {} rules", path.display(), rules.len());

            for rule in rules {
                summary.rules_read += 1;
                match rule.yaml_line() {
                    Some(line) => {
                        yaml.push_str(&line);
                        summary.rules_exported += 1;
                    }
                    None => debug!(
                        "Dropping rule for {}: from {} to {} with {} parameters",
                        rule.method,
                        rule.from,
                        rule.to,
                        rule.param_count()
                    ),
                }
            }
        }

        tokio::fs::write(&self.output, yaml).await?;
        info!(
            "Exported {} of {} rules from {} files to {}",
            summary.rules_exported,
            summary.rules_read,
            summary.files_read,
            self.output.display()
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn rule(method: &str, from: Value, to: Value) -> TransferRule {
        TransferRule {
            method: method.to_string(),
            from,
            to,
        }
    }

    fn exporter(dir: &TempDir) -> RuleExporter {
        RuleExporter::new(&RulesConfig {
            dir: dir.path().to_path_buf(),
            ..RulesConfig::default()
        })
    }

    #[test]
    fn test_param_count() {
        let count = |m: &str| rule(m, json!("base"), json!("result")).param_count();
        assert_eq!(count("<a.B: void run()>"), 0);
        assert_eq!(count("<a.B: void put(java.lang.String,int)>"), 2);
        assert_eq!(count("<a.B: void put(java.lang.String, int, long)>"), 3);
        assert_eq!(count("<a.B: void broken>"), 0);
        assert_eq!(count("<a.B: void open(int"), 0);
    }

    #[test]
    fn test_yaml_line_shape() {
        let line = rule("<a.B: a.C<a.D>> get(int)>", json!(0), json!("result"))
            .yaml_line()
            .unwrap();
        assert_eq!(
            line,
            "- { method: \"<a.B: a.C<a.D> get(int)>\", from: 0, to: result }\n"
        );
    }

    #[test]
    fn test_endpoints_must_be_in_range() {
        let method = "<a.B: void put(java.lang.String, int)>";
        assert!(rule(method, json!("base"), json!("1")).yaml_line().is_some());
        assert!(rule(method, json!(1), json!("result")).yaml_line().is_some());
        assert!(rule(method, json!(2), json!("result")).yaml_line().is_none());
        assert!(rule(method, json!("this"), json!("result")).yaml_line().is_none());
        assert!(rule(method, json!(-1), json!("base")).yaml_line().is_none());
        assert!(rule(method, json!(true), json!("base")).yaml_line().is_none());
        assert!(rule("<a.B: void run()>", json!(0), json!("base")).yaml_line().is_none());
    }

    #[test]
    fn test_discover_matches_prefix_and_extension() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("transfer_rules_B.json"), "[]").unwrap();
        std::fs::write(dir.path().join("transfer_rules_A.json"), "[]").unwrap();
        std::fs::write(dir.path().join("transfer_rules_A.txt"), "[]").unwrap();
        std::fs::write(dir.path().join("other_rules.json"), "[]").unwrap();
        std::fs::create_dir_all(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/transfer_rules_C.json"), "[]").unwrap();

        let names: Vec<String> = exporter(&dir)
            .discover()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["transfer_rules_A.json", "transfer_rules_B.json"]);
    }

    #[tokio::test]
    async fn test_export_writes_valid_rules_in_file_order() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("transfer_rules_Foo.json"),
            r#"[
                {"method": "<a.Foo: java.lang.String wrap(java.lang.String)>", "from": 0, "to": "result"},
                {"method": "<a.Foo: void run()>", "from": 0, "to": "base"}
            ]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("transfer_rules_Bar.json"),
            r#"[{"method": "<a.Bar: void set(int)>", "from": "0", "to": "base"}]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("transfer_rules_Bad.json"), "not json").unwrap();

        let summary = exporter(&dir).export().await.unwrap();
        assert_eq!(
            summary,
            ExportSummary {
                files_read: 2,
                rules_read: 3,
                rules_exported: 2,
                failures: 1,
            }
        );

        let yaml = std::fs::read_to_string(dir.path().join("output.yml")).unwrap();
        assert_eq!(
            yaml,
            "- { method: \"<a.Bar: void set(int)>\", from: 0, to: base }\n\
             - { method: \"<a.Foo: java.lang.String wrap(java.lang.String)>\", from: 0, to: result }\n"
        );
    }

    #[tokio::test]
    async fn test_no_rule_files_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = exporter(&dir).export().await;
        assert!(matches!(result, Err(ApiScanError::NoRuleFiles(_))));
        assert!(!dir.path().join("output.yml").exists());
    }
}
