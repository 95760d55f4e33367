//! # plagscan matcher
//!
//! ## Purpose
//!
//! `matcher` compares candidate documents against a shared
//! [`index::ReferenceIndex`] and turns the per-candidate outcomes into a
//! summary. Two signals decide which reference token ids a candidate repeats:
//!
//! - **Window overlap**: a reference window is flagged when enough of its
//!   contents occur together inside one candidate window.
//! - **Trigram overlap**: once a candidate shares enough distinct word
//!   trigrams with the reference, the origin ids of the shared trigrams are
//!   attributed to it.
//!
//! [`MatchStrategy`] selects one signal or their union.
//!
//! ## Core Types
//!
//! - [`Matcher`]: normalizes and matches one candidate at a time; share it
//!   between workers.
//! - [`MatchConfig`]: thresholds and strategy.
//! - [`MatchResult`]: matched ids plus the bookkeeping later passes need.
//! - [`Aggregator`] and [`summarize`]: submission-ordered results, per
//!   candidate and overall percentages, [`PlagiarismLevel`].
//! - [`apply_distinctiveness`]: optional pass for large candidate sets.
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use canonical::{tokenize_reference, NormalizeConfig, Stopwords};
//! use index::{IndexConfig, ReferenceIndex};
//! use matcher::{color_for, summarize, MatchConfig, Matcher};
//!
//! let normalize = NormalizeConfig::default();
//! let index_cfg = IndexConfig::default();
//! let text = "copper kettles whistle softly beneath amber lanterns while sleepy merchants count silver";
//! let tokens = tokenize_reference(text, &normalize).unwrap();
//! let reference = ReferenceIndex::build(&tokens, &Stopwords::from_config(&normalize), &index_cfg).unwrap();
//!
//! let matcher = Matcher::new(Arc::new(reference), normalize, index_cfg, MatchConfig::default()).unwrap();
//! let result = matcher.match_text("essay-1", 0, color_for(0), text).unwrap();
//!
//! let summary = summarize(&[result], matcher.reference().token_count());
//! assert_eq!(summary.overall_percentage, 100.0);
//! ```

pub mod aggregate;
pub mod distinct;
pub mod engine;
pub mod palette;
pub mod trigram;
pub mod types;

pub use crate::aggregate::{
    percentage, summarize, Aggregator, CandidateSummary, PlagiarismLevel, Summary,
};
pub use crate::distinct::{apply_distinctiveness, DistinctConfig, DistinctSummary};
pub use crate::engine::{find_matching_ids, Matcher, WindowMatches};
pub use crate::palette::{color_for, DisplayColor, PALETTE};
pub use crate::trigram::{compare_trigram_sets, shared_trigrams};
pub use crate::types::{
    MatchConfig, MatchError, MatchResult, MatchStrategy, MatchThreshold, TrigramComparison,
};
