//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/reposcope/) and project (.reposcope/) level configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{analysis, diagram};
use crate::types::{Result, ScopeError};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// File selection and extraction settings
    pub analysis: AnalysisConfig,

    /// External diagram tool settings
    pub diagram: DiagramConfig,

    /// Structure dump settings
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            analysis: AnalysisConfig::default(),
            diagram: DiagramConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `ScopeError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.analysis.extensions.is_empty() {
            return Err(ScopeError::Config(
                "analysis.extensions must list at least one extension".to_string(),
            ));
        }

        if self.analysis.workers == 0 {
            return Err(ScopeError::Config(
                "analysis.workers must be greater than 0".to_string(),
            ));
        }

        if self.analysis.max_file_size == 0 {
            return Err(ScopeError::Config(
                "analysis.max_file_size must be greater than 0".to_string(),
            ));
        }

        for pattern in &self.analysis.exclude {
            glob::Pattern::new(pattern).map_err(|e| {
                ScopeError::Config(format!("Invalid exclude pattern '{}': {}", pattern, e))
            })?;
        }

        if self.diagram.command.trim().is_empty() {
            return Err(ScopeError::Config(
                "diagram.command must not be empty".to_string(),
            ));
        }

        if self.diagram.timeout_secs == 0 {
            return Err(ScopeError::Config(
                "diagram.timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Analysis Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// File extensions to analyze, without the dot
    pub extensions: Vec<String>,

    /// Glob patterns matched against paths relative to the root
    pub exclude: Vec<String>,

    /// Files larger than this (bytes) are skipped
    pub max_file_size: u64,

    /// Worker threads for per-file extraction
    pub workers: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            extensions: analysis::DEFAULT_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclude: analysis::DEFAULT_EXCLUDES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_file_size: analysis::MAX_FILE_SIZE,
            workers: analysis::DEFAULT_WORKERS,
        }
    }
}

// =============================================================================
// Diagram Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Generator command; leading arguments allowed
    pub command: String,

    /// Subprocess timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            command: diagram::DEFAULT_COMMAND.to_string(),
            timeout_secs: diagram::DEFAULT_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Structure dump format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty JSON array of file records
    #[default]
    Json,
    /// One row per file
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!(
                "Unknown output format: {}. Valid values: json, csv",
                s
            )),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
