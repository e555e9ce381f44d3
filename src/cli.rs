use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::Result;
use tracing::info;

use crate::config::{BodyMode, Config, GenericSplit};
use crate::core::Engine;

#[derive(Parser)]
#[command(name = "apiscan")]
#[command(about = "Extract public API method signatures and bodies from Java sources")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a directory tree and write one report per source file
    Scan {
        /// Root directory to analyze (defaults to `lib`)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Directory for the generated reports
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Match method bodies by brace depth instead of the first `}`
        #[arg(long)]
        balanced_bodies: bool,

        /// Split generic arguments only on top-level commas
        #[arg(long)]
        depth_aware_generics: bool,

        /// Also write a JSON index of every reported method
        #[arg(long)]
        index: bool,
    },

    /// Print every method extracted from one file, excluded ones included
    Inspect {
        /// Source file to analyze
        file: PathBuf,
    },

    /// Parse a report file back into records and print them as JSON
    Records {
        /// Report file written by `scan`
        report: PathBuf,
    },

    /// Merge `transfer_rules_*.json` files into one YAML rule list
    ExportRules {
        /// Directory holding the rule files (defaults to current directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// YAML file to write (defaults to `output.yml` inside the rule directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a default configuration file
    Init {
        /// Target directory (defaults to current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn execute(self, mut config: Config) -> Result<()> {
        match self.command {
            Commands::Scan {
                root,
                output,
                balanced_bodies,
                depth_aware_generics,
                index,
            } => {
                if let Some(root) = root {
                    config.scan.root_dir = root;
                }
                if let Some(output) = output {
                    config.output.dir = output;
                }
                if balanced_bodies {
                    config.heuristics.body_mode = BodyMode::Balanced;
                }
                if depth_aware_generics {
                    config.heuristics.generic_split = GenericSplit::DepthAware;
                }
                if index {
                    config.output.write_index = true;
                }

                let summary = Engine::new(config)?.scan().await?;
                if summary.root_missing {
                    info!("Nothing scanned; create the root directory or pass --root");
                }
                Ok(())
            }
            Commands::Inspect { file } => {
                let parsed = Engine::new(config)?.inspect(&file).await?;
                for method in &parsed.methods {
                    print!("{}", method);
                }
                info!(
                    "{} (package {}): {} methods extracted, {} public API, {} skipped",
                    parsed.path.display(),
                    parsed.unit.package_name.as_deref().unwrap_or("null"),
                    parsed.methods.len(),
                    parsed.public_api().count(),
                    parsed.skipped
                );
                Ok(())
            }
            Commands::Records { report } => {
                let records = Engine::new(config)?.records(&report).await?;
                println!("{}", serde_json::to_string_pretty(&records)?);
                info!("{}: {} records", report.display(), records.len());
                Ok(())
            }
            Commands::ExportRules { dir, output } => {
                if let Some(dir) = dir {
                    config.rules.dir = dir;
                }
                Engine::new(config)?.export_rules(output).await?;
                Ok(())
            }
            Commands::Init { path } => {
                Engine::init(path)?;
                Ok(())
            }
        }
    }
}
