//! Configuration and error types for reference index construction.
//!
//! The configuration is free of I/O so that index construction stays a pure
//! function of `(tokens, stopwords, config)`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use canonical::TokenId;

/// How trigram entries whose key was already seen are treated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrigramAttribution {
    /// Only the first occurrence of a key records word ids; later repeats of
    /// the same phrase are never attributed.
    #[default]
    FirstOccurrence,
    /// Every occurrence appends its word ids to the existing entry.
    AllOccurrences,
}

/// Configuration for window and trigram indices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndexConfig {
    /// Configuration schema version.
    pub version: u32,
    /// Number of tokens per sliding window (k).
    ///
    /// Larger windows demand longer copied passages before anything is
    /// flagged.
    pub window_size: usize,
    /// Candidate token count above which candidate windows are sampled
    /// instead of built at every offset.
    pub large_doc_threshold: usize,
    /// Approximate number of windows kept for a sampled candidate. The stride
    /// is `max(1, tokens / sample_target)`.
    pub sample_target: usize,
    /// Word id attribution for repeated trigram keys.
    pub trigram_attribution: TrigramAttribution,
    /// Build reference windows with Rayon. Output is identical either way.
    pub use_parallel: bool,
}

impl IndexConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window size (k). Typical values: 8-15.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_large_doc_threshold(mut self, threshold: usize) -> Self {
        self.large_doc_threshold = threshold;
        self
    }

    pub fn with_sample_target(mut self, target: usize) -> Self {
        self.sample_target = target;
        self
    }

    pub fn with_trigram_attribution(mut self, attribution: TrigramAttribution) -> Self {
        self.trigram_attribution = attribution;
        self
    }

    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    /// Window start stride for a candidate of `token_count` tokens.
    pub fn sampling_stride(&self, token_count: usize) -> usize {
        if token_count > self.large_doc_threshold {
            (token_count / self.sample_target.max(1)).max(1)
        } else {
            1
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.version < 1 {
            return Err(IndexError::InvalidConfigVersion {
                version: self.version,
            });
        }
        if self.window_size < 1 {
            return Err(IndexError::InvalidWindowSize {
                window_size: self.window_size,
            });
        }
        if self.sample_target < 1 {
            return Err(IndexError::InvalidSampleTarget {
                sample_target: self.sample_target,
            });
        }
        Ok(())
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            version: 1,
            window_size: 12,
            large_doc_threshold: 10_000,
            sample_target: 1_000,
            trigram_attribution: TrigramAttribution::FirstOccurrence,
            use_parallel: false,
        }
    }
}

/// Errors returned while building or publishing reference indices.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("invalid config: window_size must be >= 1 (got {window_size})")]
    InvalidWindowSize { window_size: usize },

    #[error("invalid config: sample_target must be >= 1 (got {sample_target})")]
    InvalidSampleTarget { sample_target: usize },

    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },

    #[error("reference stream is empty")]
    EmptyReference,

    #[error("malformed window {index}: {ids} ids vs {contents} contents")]
    MalformedWindow {
        index: usize,
        ids: usize,
        contents: usize,
    },

    #[error("window {index} references unknown token id {id}")]
    UnknownTokenId { index: usize, id: TokenId },
}
