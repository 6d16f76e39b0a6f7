//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for the rextract pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RextractConfig {
    /// Response repair configuration.
    pub sanitizer: SanitizerConfig,

    /// Record projection configuration.
    pub projection: ProjectionConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Which repair stages the sanitizer runs. Trimming always runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    /// Convert single-quoted keys and values to double quotes.
    pub normalize_quotes: bool,

    /// Remove commas directly before `}` or `]`.
    pub strip_trailing_commas: bool,

    /// Remove line breaks.
    pub strip_line_breaks: bool,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            normalize_quotes: true,
            strip_trailing_commas: true,
            strip_line_breaks: true,
        }
    }
}

/// Record projection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Read numeric strings such as "2" or "₹ 1,234.50" as numbers.
    pub lenient_numbers: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            lenient_numbers: true,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty_json: bool,
}

impl RextractConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
