use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use canonical::{CanonicalError, TokenId};
use index::IndexError;

use crate::palette::DisplayColor;

/// Which signals decide a candidate's matched ids.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Sliding-window overlap only.
    Windowed,
    /// Trigram overlap only.
    Trigram,
    /// Union of both.
    #[default]
    Hybrid,
}

impl MatchStrategy {
    pub fn uses_windows(self) -> bool {
        matches!(self, MatchStrategy::Windowed | MatchStrategy::Hybrid)
    }

    pub fn uses_trigrams(self) -> bool {
        matches!(self, MatchStrategy::Trigram | MatchStrategy::Hybrid)
    }
}

/// Minimum number of shared window entries, as an absolute count or as a
/// fraction of the window size.
///
/// Deserializes from a bare number: integers become `Count`, anything with a
/// fractional part becomes `Fraction`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MatchThreshold {
    Count(usize),
    Fraction(f64),
}

impl MatchThreshold {
    /// Absolute count for windows of `window_size` tokens.
    pub fn resolve(self, window_size: usize) -> usize {
        match self {
            MatchThreshold::Count(n) => n,
            MatchThreshold::Fraction(f) => (f * window_size as f64).ceil() as usize,
        }
    }
}

impl Default for MatchThreshold {
    fn default() -> Self {
        MatchThreshold::Count(8)
    }
}

/// Configuration for the matcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchConfig {
    /// Configuration schema version.
    pub version: u32,
    pub strategy: MatchStrategy,
    /// Window overlap needed to flag a reference window (default 8 of 12).
    pub match_threshold: MatchThreshold,
    /// Shared distinct trigrams needed before the comparator attributes any
    /// ids (default 21).
    pub trigram_threshold: usize,
}

impl MatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_match_threshold(mut self, threshold: MatchThreshold) -> Self {
        self.match_threshold = threshold;
        self
    }

    pub fn with_trigram_threshold(mut self, threshold: usize) -> Self {
        self.trigram_threshold = threshold;
        self
    }

    /// Validate against the window size the reference index was built with.
    pub fn validate(&self, window_size: usize) -> Result<(), MatchError> {
        if self.version < 1 {
            return Err(MatchError::InvalidConfig(format!(
                "config version must be >= 1 (got {})",
                self.version
            )));
        }
        if let MatchThreshold::Fraction(f) = self.match_threshold {
            if !(f > 0.0 && f <= 1.0) {
                return Err(MatchError::InvalidConfig(format!(
                    "match_threshold fraction must be in (0, 1] (got {f})"
                )));
            }
        }
        let resolved = self.match_threshold.resolve(window_size);
        if resolved == 0 || resolved > window_size {
            return Err(MatchError::InvalidConfig(format!(
                "match_threshold must be between 1 and window_size={window_size} (got {resolved})"
            )));
        }
        if self.trigram_threshold == 0 {
            return Err(MatchError::InvalidConfig(
                "trigram_threshold must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            version: 1,
            strategy: MatchStrategy::Hybrid,
            match_threshold: MatchThreshold::default(),
            trigram_threshold: 21,
        }
    }
}

/// Outcome of comparing a candidate's trigram set against the reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrigramComparison {
    pub is_match: bool,
    /// Shared trigrams found by the dictionary scan, or the exact overlap
    /// when the pre-check rejected the candidate.
    pub match_count: usize,
    pub matched_word_ids: BTreeSet<TokenId>,
}

/// Per-candidate match outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    pub candidate_id: String,
    /// Submission position; results are ordered by it, never by completion.
    pub candidate_index: usize,
    pub display_color: DisplayColor,
    /// Reference token ids repeated in this candidate.
    pub matched_ids: BTreeSet<TokenId>,
    /// (candidate window, reference window) pairs that crossed the threshold.
    pub window_hits: usize,
    pub trigram_matches: usize,
    /// Candidate trigrams also present in the reference, deduplicated and
    /// sorted. Input to the distinctiveness filter.
    #[serde(skip)]
    pub shared_trigrams: Vec<String>,
}

/// Errors produced while matching.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("malformed reference window {index}: {ids} ids vs {contents} contents")]
    MalformedWindow {
        index: usize,
        ids: usize,
        contents: usize,
    },
    #[error("candidate tokenization failed: {0}")]
    Canonical(#[from] CanonicalError),
    #[error("reference index rejected: {0}")]
    Index(#[from] IndexError),
}
