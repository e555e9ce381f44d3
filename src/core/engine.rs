// src/core/engine.rs
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::ApiScanError;
use super::{
    read_report, CodeParser, ExportSummary, IndexEntry, ParsedFile, ReportEmitter, ReportRecord,
    RuleExporter,
};

/// Counters for one scan run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub root_missing: bool,
    pub files_scanned: usize,
    pub reports_written: usize,
    pub files_without_api: usize,
    pub methods_reported: usize,
    pub failures: usize,
}

/// Main orchestration engine: discover, analyze, filter, emit
pub struct Engine {
    config: Config,
    parser: CodeParser,
    emitter: ReportEmitter,
}

impl Engine {
    pub fn new(config: Config) -> Result<Self> {
        debug!("Loaded configuration: {:?}", config);

        let parser = CodeParser::new(&config.scan, &config.heuristics)?;
        let emitter = ReportEmitter::new(&config.output);

        Ok(Self {
            config,
            parser,
            emitter,
        })
    }

    /// Process the configured root directory and write one report per file
    /// with at least one public API method
    pub async fn scan(&self) -> Result<RunSummary> {
        let root = &self.config.scan.root_dir;
        let mut summary = RunSummary::default();

        if !root.exists() {
            error!("{}", ApiScanError::MissingRoot(root.clone()));
            summary.root_missing = true;
            return Ok(summary);
        }

        tokio::fs::create_dir_all(self.emitter.output_dir())
            .await
            .with_context(|| {
                format!(
                    "Failed to create output directory {}",
                    self.emitter.output_dir().display()
                )
            })?;

        info!(
            "Scanning {} for {} sources",
            root.display(),
            self.parser.language_name()
        );

        let mut index = Vec::new();

        for path in self.parser.discover(root) {
            summary.files_scanned += 1;

            match self.process_file(&path).await {
                Ok(Some((report_path, entries))) => {
                    info!("Generated report: {}", report_path.display());
                    summary.reports_written += 1;
                    summary.methods_reported += entries.len();
                    index.extend(entries);
                }
                Ok(None) => {
                    info!("No public API methods in {}", path.display());
                    summary.files_without_api += 1;
                }
                Err(e) => {
                    error!("Failed to process {}: {}", path.display(), e);
                    summary.failures += 1;
                }
            }
        }

        if self.config.output.write_index {
            match self.emitter.write_index(&index).await {
                Ok(path) => info!("Wrote index of {} methods to {}", index.len(), path.display()),
                Err(e) => {
                    warn!("Failed to write method index: {}", e);
                    summary.failures += 1;
                }
            }
        }

        info!(
            "Analysis complete: {} files scanned, {} reports written ({} methods), {} without public API, {} failed",
            summary.files_scanned,
            summary.reports_written,
            summary.methods_reported,
            summary.files_without_api,
            summary.failures
        );

        Ok(summary)
    }

    /// Analyze one file; `None` when nothing in it is public API
    async fn process_file(
        &self,
        path: &Path,
    ) -> crate::error::Result<Option<(PathBuf, Vec<IndexEntry>)>> {
        let parsed = self.parser.parse_file(path).await?;
        debug!(
            "{}: {} methods, {} skipped",
            path.display(),
            parsed.methods.len(),
            parsed.skipped
        );

        let public: Vec<_> = parsed.public_api().cloned().collect();
        if public.is_empty() {
            return Ok(None);
        }

        let report_path = self.emitter.write_report(&parsed.base_name, &public).await?;

        let entries = public
            .into_iter()
            .map(|method| IndexEntry {
                source: path.to_path_buf(),
                signature: method.signature(),
                method,
            })
            .collect();

        Ok(Some((report_path, entries)))
    }

    /// Analyze a single file without writing anything
    pub async fn inspect(&self, file: &Path) -> Result<ParsedFile> {
        self.parser
            .parse_file(file)
            .await
            .with_context(|| format!("Failed to analyze {}", file.display()))
    }

    /// Read a report back into records
    pub async fn records(&self, report: &Path) -> Result<Vec<ReportRecord>> {
        read_report(report)
            .await
            .with_context(|| format!("Failed to read report {}", report.display()))
    }

    /// Merge the configured transfer rule files into one YAML list
    pub async fn export_rules(&self, output: Option<PathBuf>) -> Result<ExportSummary> {
        let mut exporter = RuleExporter::new(&self.config.rules);
        if let Some(output) = output {
            exporter = exporter.with_output(output);
        }

        let summary = exporter.export().await?;
        if summary.failures > 0 {
            warn!(
                "{} rule files could not be read; {} is incomplete",
                summary.failures,
                exporter.output_path().display()
            );
        }
        Ok(summary)
    }

    /// Write a default configuration file into `path` (or the current directory)
    pub fn init(path: Option<PathBuf>) -> Result<PathBuf> {
        let dir = path.unwrap_or_else(|| PathBuf::from("."));
        let target = dir.join(Config::default_file_name());

        if target.exists() {
            warn!("{} already exists, leaving it untouched", target.display());
            return Ok(target);
        }

        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        Config::default().save(&target)?;
        info!("Wrote default configuration to {}", target.display());
        Ok(target)
    }
}
