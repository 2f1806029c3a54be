//! Configuration structures for the statement pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the stmtx pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StmtxConfig {
    /// Transaction line parser configuration.
    pub parser: ParserConfig,

    /// Statement file discovery configuration.
    pub discovery: DiscoveryConfig,

    /// Report output configuration.
    pub report: ReportConfig,
}

/// Markers that drive the transaction section tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// A line containing this text opens the transaction section.
    pub section_marker: String,

    /// Lines containing this text inside the section are carry-forwards, not transactions.
    pub skip_marker: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            section_marker: "TRANSACTION DETAIL".to_string(),
            skip_marker: "Beginning Balance".to_string(),
        }
    }
}

/// Statement file discovery configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// File extension of statement files (matched case-insensitively).
    pub extension: String,

    /// Fall back to the first immediate subfolder holding statements.
    pub search_subdirectories: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            extension: "pdf".to_string(),
            search_subdirectories: true,
        }
    }
}

/// Report output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory for report files (default: the statement folder).
    pub output_dir: Option<PathBuf>,

    /// Write the verification table next to the full table.
    pub write_verification: bool,

    /// Also export all records as JSON.
    pub write_json: bool,

    /// Text placed between the folder name and the timestamp in report file names.
    pub file_stem_suffix: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            write_verification: true,
            write_json: false,
            file_stem_suffix: "chase_transactions".to_string(),
        }
    }
}

impl StmtxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
