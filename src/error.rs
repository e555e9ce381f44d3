use std::path::PathBuf;

use thiserror::Error;

/// Main error type for apiscan operations
#[derive(Error, Debug)]
pub enum ApiScanError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("File system error: {0}")]
    FileSystem(String),

    #[error("Root directory does not exist: {}", .0.display())]
    MissingRoot(PathBuf),

    #[error("No transfer rule files found in {}", .0.display())]
    NoRuleFiles(PathBuf),
}

pub type Result<T> = std::result::Result<T, ApiScanError>;
