//! Configuration types for the normalization pipeline.
//!
//! [`NormalizeConfig`] controls how raw extracted text becomes comparable
//! token content. Both the reference and every candidate must be normalized
//! with the same configuration, otherwise window and trigram comparisons
//! silently stop matching.
//!
//! # Examples
//!
//! ```rust
//! use canonical::NormalizeConfig;
//!
//! let config = NormalizeConfig::default();
//! assert_eq!(config.version, 1);
//! assert!(config.strip_diacritics);
//! assert!(config.lowercase);
//! assert!(config.extra_stopwords.is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// Configuration for text normalization and stopword filtering.
///
/// Serializes as:
///
/// ```json
/// {
///   "version": 1,
///   "strip_diacritics": true,
///   "lowercase": true,
///   "extra_stopwords": []
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Version of the normalization behavior.
    ///
    /// Must be >= 1; version 0 is reserved and rejected.
    pub version: u32,

    /// Decompose to NFD and drop combining marks (U+0300..U+036F) so that
    /// accented letters keep their base letter ("café" → "cafe").
    ///
    /// When disabled, precomposed non-ASCII letters are removed entirely by
    /// the ASCII filter ("café" → "caf").
    pub strip_diacritics: bool,

    /// Lowercase ASCII letters.
    pub lowercase: bool,

    /// Words added to the built-in English stopword list for the trigram
    /// subsystem. Matched against normalized content.
    pub extra_stopwords: Vec<String>,
}

impl NormalizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strip_diacritics(mut self, strip: bool) -> Self {
        self.strip_diacritics = strip;
        self
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    /// Append extra stopwords. Duplicates of built-in entries are harmless.
    pub fn with_extra_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_stopwords.extend(words.into_iter().map(Into::into));
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), CanonicalError> {
        if self.version == 0 {
            return Err(CanonicalError::InvalidConfig(
                "config version must be >= 1".into(),
            ));
        }
        if let Some(word) = self.extra_stopwords.iter().find(|w| w.trim().is_empty()) {
            return Err(CanonicalError::InvalidConfig(format!(
                "extra stopword {word:?} is blank"
            )));
        }
        Ok(())
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            strip_diacritics: true,
            lowercase: true,
            extra_stopwords: Vec::new(),
        }
    }
}
