use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ApiScanError, Result};

/// Default configuration file names, checked in order
const CONFIG_CANDIDATES: [&str; 3] = ["Apiscan.toml", "apiscan.toml", ".apiscan.toml"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source discovery settings
    pub scan: ScanConfig,

    /// Report output settings
    pub output: OutputConfig,

    /// Lexical heuristic switches
    pub heuristics: HeuristicsConfig,

    /// Transfer-rule export settings
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory tree to analyze
    pub root_dir: PathBuf,

    /// Source file extension, without the leading dot
    pub extension: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the per-file reports
    pub dir: PathBuf,

    /// Prefix placed before the source base name
    pub file_prefix: String,

    /// Report file extension, without the leading dot
    pub file_suffix: String,

    /// Also write a JSON index of every reported method
    pub write_index: bool,

    /// Index file name, relative to `dir`
    pub index_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Directory holding the rule files; not searched recursively
    pub dir: PathBuf,

    /// Rule files are `{file_prefix}*.json`
    pub file_prefix: String,

    /// YAML file written by `export-rules`, relative to `dir`
    pub output_file: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicsConfig {
    pub body_mode: BodyMode,
    pub generic_split: GenericSplit,
}

/// How a method body is delimited once its opening brace is found
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyMode {
    /// The first `}` ends the body, nested blocks truncate it
    #[default]
    Truncating,
    /// Braces are depth counted until the matching `}`
    Balanced,
}

/// How the argument list of a generic type is split
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenericSplit {
    /// Every comma separates an argument
    #[default]
    Naive,
    /// Only commas outside nested `<...>` separate arguments
    DepthAware,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("lib"),
            extension: "java".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            file_prefix: "method_details_".to_string(),
            file_suffix: "txt".to_string(),
            write_index: false,
            index_file: "api_index.json".to_string(),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            file_prefix: "transfer_rules_".to_string(),
            output_file: "output.yml".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ApiScanError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ApiScanError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Ok(Self::default())
                }
            }
            None => {
                for candidate in &CONFIG_CANDIDATES {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    /// Name of the configuration file written by `init`
    pub fn default_file_name() -> &'static str {
        CONFIG_CANDIDATES[0]
    }
}
