use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use canonical::{tokenize_candidate, NormalizeConfig, Stopwords, Token, TokenId};
use index::{build_windows_strided, candidate_trigrams, IndexConfig, ReferenceIndex, Window};

use crate::palette::DisplayColor;
use crate::trigram::{compare_trigram_sets, shared_trigrams};
use crate::types::{MatchConfig, MatchError, MatchResult, TrigramComparison};


/// Ids flagged by the window pass, plus how many window pairs hit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowMatches {
    pub ids: BTreeSet<TokenId>,
    pub hits: usize,
}

/// Find reference ids repeated in candidate windows.
///
/// A reference window is flagged for a candidate window when at least
/// `threshold` of its (deduplicated) contents occur in the candidate window,
/// and then contributes all of its ids. Counting for a reference window stops
/// as soon as the misses make the threshold unreachable; windows with fewer
/// than `threshold` entries are skipped outright.
pub fn find_matching_ids(
    reference: &[Window],
    candidate: &[Window],
    threshold: usize,
) -> Result<WindowMatches, MatchError> {
    for (index, window) in reference.iter().enumerate() {
        if !window.is_well_formed() {
            return Err(MatchError::MalformedWindow {
                index,
                ids: window.ids.len(),
                contents: window.contents.len(),
            });
        }
    }

    let mut out = WindowMatches::default();
    for cand in candidate {
        let terms = cand.content_set();
        for window in reference {
            if window.len() < threshold {
                continue;
            }
            let allowed_misses = window.len() - threshold;
            let mut hits = 0;
            let mut misses = 0;
            for content in &window.contents {
                if terms.contains(content.as_str()) {
                    hits += 1;
                } else {
                    misses += 1;
                    if misses > allowed_misses {
                        break;
                    }
                }
            }
            if hits >= threshold {
                out.ids.extend(window.ids.iter().copied());
                out.hits += 1;
            }
        }
    }
    Ok(out)
}

/// Matches candidate documents against one shared reference index.
///
/// Cheap to share between workers: the reference sits behind an `Arc` and
/// nothing here is mutated after construction.
#[derive(Debug, Clone)]
pub struct Matcher {
    reference: Arc<ReferenceIndex>,
    normalize: NormalizeConfig,
    stopwords: Stopwords,
    index_cfg: IndexConfig,
    cfg: MatchConfig,
    threshold: usize,
}

impl Matcher {
    /// Validate `cfg` against the reference window size and check every
    /// reference window before any candidate is touched.
    pub fn new(
        reference: Arc<ReferenceIndex>,
        normalize: NormalizeConfig,
        index_cfg: IndexConfig,
        cfg: MatchConfig,
    ) -> Result<Self, MatchError> {
        normalize.validate()?;
        index_cfg.validate()?;
        cfg.validate(reference.window_size())?;
        reference.validate()?;

        let threshold = cfg.match_threshold.resolve(reference.window_size());
        let stopwords = Stopwords::from_config(&normalize);
        Ok(Self {
            reference,
            normalize,
            stopwords,
            index_cfg,
            cfg,
            threshold,
        })
    }

    pub fn reference(&self) -> &Arc<ReferenceIndex> {
        &self.reference
    }

    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Resolved absolute window threshold.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Normalize and match one candidate text.
    pub fn match_text(
        &self,
        candidate_id: &str,
        candidate_index: usize,
        display_color: DisplayColor,
        text: &str,
    ) -> Result<MatchResult, MatchError> {
        let tokens = tokenize_candidate(text, &self.normalize)?;
        self.match_tokens(candidate_id, candidate_index, display_color, &tokens)
    }

    /// Match an already normalized candidate stream.
    pub fn match_tokens(
        &self,
        candidate_id: &str,
        candidate_index: usize,
        display_color: DisplayColor,
        tokens: &[Token],
    ) -> Result<MatchResult, MatchError> {
        let start = Instant::now();
        let strategy = self.cfg.strategy;

        let windows = if strategy.uses_windows() {
            let stride = self.index_cfg.sampling_stride(tokens.len());
            if stride > 1 {
                debug!(
                    candidate_id,
                    tokens = tokens.len(),
                    stride,
                    "candidate_windows_sampled"
                );
            }
            let windows = build_windows_strided(tokens, self.reference.window_size(), stride);
            find_matching_ids(self.reference.windows(), &windows, self.threshold)?
        } else {
            WindowMatches::default()
        };

        let trigram_set = candidate_trigrams(tokens, &self.stopwords);
        let comparison = if strategy.uses_trigrams() {
            compare_trigram_sets(
                self.reference.trigrams(),
                &trigram_set,
                self.cfg.trigram_threshold,
            )
        } else {
            TrigramComparison::default()
        };

        let mut matched_ids = windows.ids;
        matched_ids.extend(comparison.matched_word_ids.iter().copied());

        debug!(
            candidate_id,
            candidate_index,
            tokens = tokens.len(),
            window_hits = windows.hits,
            trigram_matches = comparison.match_count,
            trigram_match = comparison.is_match,
            matched = matched_ids.len(),
            elapsed_micros = start.elapsed().as_micros(),
            "candidate_matched"
        );

        Ok(MatchResult {
            candidate_id: candidate_id.to_string(),
            candidate_index,
            display_color,
            matched_ids,
            window_hits: windows.hits,
            trigram_matches: comparison.match_count,
            shared_trigrams: shared_trigrams(self.reference.trigrams(), &trigram_set),
        })
    }
}
