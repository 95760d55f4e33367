//! YAML configuration file support.
//!
//! Every stage reads its own section; anything omitted keeps its default.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "coursework"
//!
//! normalize:
//!   version: 1
//!   strip_diacritics: true
//!   lowercase: true
//!   extra_stopwords: ["ibid"]
//!
//! index:
//!   version: 1
//!   window_size: 12
//!   large_doc_threshold: 10000
//!   sample_target: 1000
//!   trigram_attribution: first_occurrence
//!   use_parallel: false
//!
//! matcher:
//!   version: 1
//!   strategy: hybrid
//!   match_threshold: 8
//!   trigram_threshold: 21
//!
//! distinct:
//!   enabled: true
//!   scale_threshold: 15
//!
//! scheduler:
//!   pool_size: 4
//!   batch_size: 2
//!   unit_timeout_ms: 60000
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use canonical::NormalizeConfig;
use index::IndexConfig;
use matcher::{DistinctConfig, MatchConfig};

use crate::scheduler::SchedulerConfig;
use crate::EngineConfig;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct PlagscanConfig {
    /// Configuration format version
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub normalize: NormalizeConfig,

    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub matcher: MatchConfig,

    #[serde(default)]
    pub distinct: DistinctConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl PlagscanConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PlagscanConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.engine_config()
            .validate()
            .map_err(|err| ConfigLoadError::Validation(err.to_string()))
    }

    /// Stage configuration for [`crate::Engine::new`].
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            normalize: self.normalize.clone(),
            index: self.index.clone(),
            matcher: self.matcher.clone(),
            distinct: self.distinct.clone(),
            scheduler: self.scheduler.clone(),
        }
    }
}

impl Default for PlagscanConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            normalize: NormalizeConfig::default(),
            index: IndexConfig::default(),
            matcher: MatchConfig::default(),
            distinct: DistinctConfig::default(),
            scheduler: SchedulerConfig::default(),
        }
    }
}
