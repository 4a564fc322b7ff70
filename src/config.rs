/// Pipeline configuration.
///
/// Every tunable in the crate lives here so a host process can load one
/// TOML document and pass sections down. Each section has full defaults;
/// an empty document is a valid configuration.

use crate::aggregate::DisplayPolicy;
use crate::logging::{self, DataSource};
use crate::normalize::NormalizerConfig;
use crate::render::charts::WhoGuidelines;
use serde::Deserialize;
use std::fmt;
use std::fs;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    ReadError(String),
    /// The document is not valid TOML or has wrong field types.
    ParseError(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ReadError(msg) => write!(f, "Config read error: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "Config parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Configuration structure
// ---------------------------------------------------------------------------

/// Top-level configuration: one section per tunable stage.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Raw-value rejection bounds for the normalizer.
    pub normalizer: NormalizerConfig,
    /// Which sites qualify for display output.
    pub display: DisplayPolicy,
    /// WHO guideline thresholds for the chart partitioning.
    pub guidelines: WhoGuidelines,
}

impl PipelineConfig {
    /// Parses a TOML document. Missing sections and fields take their
    /// defaults; unknown keys are ignored.
    pub fn from_toml_str(document: &str) -> Result<PipelineConfig, ConfigError> {
        toml::from_str(document).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Loads configuration from a TOML file on disk.
    pub fn from_file(path: &str) -> Result<PipelineConfig, ConfigError> {
        let document =
            fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))?;
        let config = Self::from_toml_str(&document)?;
        logging::info(
            DataSource::Config,
            None,
            &format!("loaded configuration from {}", path),
        );
        Ok(config)
    }
}
