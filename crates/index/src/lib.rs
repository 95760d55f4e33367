//! # plagscan reference index
//!
//! Builds the two read-only structures every candidate is compared against:
//!
//! 1.  **Window index**: one content-deduplicated window of `k` consecutive
//!     tokens per start offset of the reference stream.
//! 2.  **Trigram index**: a dictionary of word trigrams over the
//!     stopword-filtered reference stream, plus the set of all distinct
//!     readable trigrams.
//!
//! Both are built once per run and published together as a
//! [`ReferenceIndex`], normally behind an `Arc`. Nothing mutates them after
//! publication, so concurrent readers need no synchronization.
//!
//! ## Example Usage
//!
//! ```
//! use canonical::{tokenize_reference, NormalizeConfig, Stopwords};
//! use index::{IndexConfig, ReferenceIndex};
//!
//! let cfg = NormalizeConfig::default();
//! let tokens = tokenize_reference("the quick brown fox jumps over the lazy dog", &cfg).unwrap();
//! let index_cfg = IndexConfig::new().with_window_size(4);
//!
//! let reference = ReferenceIndex::build(&tokens, &Stopwords::english(), &index_cfg).unwrap();
//!
//! assert_eq!(reference.windows().len(), tokens.len() - 4 + 1);
//! assert!(reference.trigrams().readable_set().contains("quick brown fox"));
//! ```

pub mod config;
pub mod trigram;
pub mod window;

use std::time::Instant;

use fxhash::FxHashSet;
use tracing::debug;

use canonical::{Stopwords, Token, TokenId};

pub use crate::config::{IndexConfig, IndexError, TrigramAttribution};
pub use crate::trigram::{candidate_trigrams, TrigramEntry, TrigramIndex, TrigramSet};
pub use crate::window::{build_windows, build_windows_parallel, build_windows_strided, Window};

/// Reference-side indices, built once and shared read-only.
#[derive(Debug, Clone)]
pub struct ReferenceIndex {
    token_count: usize,
    window_size: usize,
    windows: Vec<Window>,
    trigrams: TrigramIndex,
}

impl ReferenceIndex {
    /// Build window and trigram indices from a normalized reference stream.
    ///
    /// `tokens` is the full stream; stopword removal for the trigram side
    /// happens here.
    pub fn build(
        tokens: &[Token],
        stopwords: &Stopwords,
        cfg: &IndexConfig,
    ) -> Result<Self, IndexError> {
        cfg.validate()?;
        if tokens.is_empty() {
            return Err(IndexError::EmptyReference);
        }

        let start = Instant::now();
        let windows = if cfg.use_parallel {
            build_windows_parallel(tokens, cfg.window_size)
        } else {
            build_windows(tokens, cfg.window_size)
        };

        let filtered = stopwords.strip(tokens);
        let trigrams = TrigramIndex::build(&filtered, cfg.trigram_attribution);

        debug!(
            tokens = tokens.len(),
            windows = windows.len(),
            trigrams = trigrams.len(),
            elapsed_micros = start.elapsed().as_micros(),
            "reference_index_built"
        );

        Ok(Self {
            token_count: tokens.len(),
            window_size: cfg.window_size,
            windows,
            trigrams,
        })
    }

    /// Assemble an index from externally produced parts, validating window
    /// shape and id membership.
    pub fn from_parts(
        tokens: &[Token],
        window_size: usize,
        windows: Vec<Window>,
        trigrams: TrigramIndex,
    ) -> Result<Self, IndexError> {
        if tokens.is_empty() {
            return Err(IndexError::EmptyReference);
        }
        if window_size < 1 {
            return Err(IndexError::InvalidWindowSize { window_size });
        }
        let index = Self {
            token_count: tokens.len(),
            window_size,
            windows,
            trigrams,
        };
        let known: FxHashSet<TokenId> = tokens.iter().map(|t| t.id).collect();
        index.validate_against(&known)?;
        Ok(index)
    }

    /// Check every window for the `ids.len() == contents.len()` invariant.
    pub fn validate(&self) -> Result<(), IndexError> {
        for (index, window) in self.windows.iter().enumerate() {
            if !window.is_well_formed() {
                return Err(IndexError::MalformedWindow {
                    index,
                    ids: window.ids.len(),
                    contents: window.contents.len(),
                });
            }
        }
        Ok(())
    }

    fn validate_against(&self, known: &FxHashSet<TokenId>) -> Result<(), IndexError> {
        self.validate()?;
        for (index, window) in self.windows.iter().enumerate() {
            if let Some(&id) = window.ids.iter().find(|id| !known.contains(id)) {
                return Err(IndexError::UnknownTokenId { index, id });
            }
        }
        Ok(())
    }

    /// Number of tokens in the normalized reference stream; the denominator
    /// of every percentage.
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn trigrams(&self) -> &TrigramIndex {
        &self.trigrams
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(text: &str) -> Vec<Token> {
        text.split(' ')
            .enumerate()
            .map(|(i, w)| Token::new(i as TokenId, w))
            .collect()
    }

    #[test]
    fn build_reports_token_count_and_windows() {
        let tokens = stream("alpha beta gamma delta epsilon zeta eta theta");
        let cfg = IndexConfig::new().with_window_size(3);
        let index = ReferenceIndex::build(&tokens, &Stopwords::english(), &cfg).unwrap();
        assert_eq!(index.token_count(), 8);
        assert_eq!(index.window_size(), 3);
        assert_eq!(index.windows().len(), 6);
        assert_eq!(index.trigrams().len(), 6);
    }

    #[test]
    fn empty_reference_rejected() {
        let res = ReferenceIndex::build(&[], &Stopwords::english(), &IndexConfig::default());
        assert!(matches!(res, Err(IndexError::EmptyReference)));
    }

    #[test]
    fn from_parts_rejects_malformed_window() {
        let tokens = stream("a b c");
        let bad = Window {
            ids: vec![0, 1],
            contents: vec!["a".into()],
        };
        let res = ReferenceIndex::from_parts(&tokens, 3, vec![bad], TrigramIndex::default());
        assert_eq!(
            res.unwrap_err(),
            IndexError::MalformedWindow {
                index: 0,
                ids: 2,
                contents: 1
            }
        );
    }

    #[test]
    fn from_parts_rejects_unknown_ids() {
        let tokens = stream("a b c");
        let stray = Window {
            ids: vec![0, 9],
            contents: vec!["a".into(), "z".into()],
        };
        let res = ReferenceIndex::from_parts(&tokens, 2, vec![stray], TrigramIndex::default());
        assert_eq!(res.unwrap_err(), IndexError::UnknownTokenId { index: 0, id: 9 });
    }

    #[test]
    fn stopwords_only_affect_trigrams() {
        let tokens = stream("the cat and the hat");
        let cfg = IndexConfig::new().with_window_size(5);
        let index = ReferenceIndex::build(&tokens, &Stopwords::english(), &cfg).unwrap();
        assert_eq!(index.windows()[0].contents, vec!["the", "cat", "and", "hat"]);
        // "cat hat" is all that survives; no trigram possible.
        assert!(index.trigrams().is_empty());
    }
}
