//! Distinctiveness pass for large candidate sets.
//!
//! With many candidates, phrases shared by only one of them are strong
//! evidence that that candidate copied from the reference, even below the
//! comparator threshold. The pass credits each such trigram's reference ids
//! to its sole owner. It only ever adds ids.

use std::collections::BTreeMap;

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use canonical::TokenId;
use index::TrigramIndex;

use crate::types::MatchResult;

/// When the distinctiveness pass runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DistinctConfig {
    pub enabled: bool,
    /// The pass runs only when more than this many candidates were submitted.
    pub scale_threshold: usize,
}

impl DistinctConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_scale_threshold(mut self, threshold: usize) -> Self {
        self.scale_threshold = threshold;
        self
    }

    /// Whether a run over `candidate_count` submitted candidates qualifies.
    pub fn applies_to(&self, candidate_count: usize) -> bool {
        self.enabled && candidate_count > self.scale_threshold
    }
}

impl Default for DistinctConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scale_threshold: 15,
        }
    }
}

/// What the pass changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DistinctSummary {
    /// Shared trigrams owned by exactly one candidate.
    pub distinctive_trigrams: usize,
    /// Distinctive trigrams with no dictionary entry (lost a key collision).
    pub unresolved: usize,
    /// Ids newly added across all candidates.
    pub ids_added: usize,
}

/// Credit reference ids of distinctive trigrams to their sole owner.
///
/// Document frequency is counted over `results`; a candidate missing from
/// the slice (failed or never run) owns nothing.
pub fn apply_distinctiveness(results: &mut [MatchResult], trigrams: &TrigramIndex) -> DistinctSummary {
    // trigram -> (document frequency, owner position)
    let mut df: FxHashMap<&str, (usize, usize)> = FxHashMap::default();
    for (pos, result) in results.iter().enumerate() {
        let mut last: Option<&str> = None;
        for trigram in &result.shared_trigrams {
            // shared_trigrams is sorted, so duplicates are adjacent.
            if last == Some(trigram.as_str()) {
                continue;
            }
            last = Some(trigram.as_str());
            df.entry(trigram.as_str())
                .and_modify(|(count, _)| *count += 1)
                .or_insert((1, pos));
        }
    }

    let mut summary = DistinctSummary::default();
    let mut credits: BTreeMap<usize, Vec<TokenId>> = BTreeMap::new();
    for (trigram, (count, owner)) in df {
        if count != 1 {
            continue;
        }
        summary.distinctive_trigrams += 1;
        match trigrams.lookup_readable(trigram) {
            Some(entry) => credits
                .entry(owner)
                .or_default()
                .extend_from_slice(&entry.word_ids),
            None => {
                debug!(trigram, "distinctive_trigram_unresolved");
                summary.unresolved += 1;
            }
        }
    }

    for (owner, ids) in credits {
        let result = &mut results[owner];
        let before = result.matched_ids.len();
        result.matched_ids.extend(ids);
        let added = result.matched_ids.len() - before;
        if added > 0 {
            debug!(
                candidate_id = %result.candidate_id,
                ids_added = added,
                "distinctive_ids_credited"
            );
        }
        summary.ids_added += added;
    }
    summary
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::palette::color_for;
    use canonical::Token;
    use index::TrigramAttribution;

    fn reference() -> TrigramIndex {
        let words = ["alpha", "beta", "gamma", "delta", "epsilon", "zeta"];
        let tokens: Vec<Token> = words
            .iter()
            .enumerate()
            .map(|(i, w)| Token::new(i as TokenId, *w))
            .collect();
        TrigramIndex::build(&tokens, TrigramAttribution::FirstOccurrence)
    }

    fn result(index: usize, shared: &[&str], matched: &[TokenId]) -> MatchResult {
        let mut shared: Vec<String> = shared.iter().map(|s| s.to_string()).collect();
        shared.sort_unstable();
        MatchResult {
            candidate_id: format!("c{index}"),
            candidate_index: index,
            display_color: color_for(index),
            matched_ids: matched.iter().copied().collect(),
            window_hits: 0,
            trigram_matches: 0,
            shared_trigrams: shared,
        }
    }

    #[test]
    fn scale_switch() {
        let cfg = DistinctConfig::default();
        assert!(!cfg.applies_to(15));
        assert!(cfg.applies_to(16));
        assert!(!cfg.clone().with_enabled(false).applies_to(100));
        assert!(cfg.with_scale_threshold(2).applies_to(3));
    }

    #[test]
    fn sole_owner_gets_ids() {
        let mut results = vec![
            result(0, &["alpha beta gamma", "beta gamma delta"], &[]),
            result(1, &["beta gamma delta"], &[]),
            result(2, &[], &[5]),
        ];
        let summary = apply_distinctiveness(&mut results, &reference());

        assert_eq!(summary.distinctive_trigrams, 1);
        assert_eq!(summary.ids_added, 3);
        assert_eq!(results[0].matched_ids, BTreeSet::from([0, 1, 2]));
        assert!(results[1].matched_ids.is_empty());
        assert_eq!(results[2].matched_ids, BTreeSet::from([5]));
    }

    #[test]
    fn pass_only_adds() {
        let mut results = vec![
            result(0, &["gamma delta epsilon"], &[0, 1, 2, 3]),
            result(1, &["delta epsilon zeta"], &[]),
        ];
        let before: Vec<BTreeSet<TokenId>> = results.iter().map(|r| r.matched_ids.clone()).collect();
        let summary = apply_distinctiveness(&mut results, &reference());

        for (r, prev) in results.iter().zip(&before) {
            assert!(r.matched_ids.is_superset(prev));
        }
        assert_eq!(results[0].matched_ids, BTreeSet::from([0, 1, 2, 3, 4]));
        assert_eq!(results[1].matched_ids, BTreeSet::from([3, 4, 5]));
        assert_eq!(summary.ids_added, 4);
    }

    #[test]
    fn unknown_trigram_is_unresolved() {
        let mut results = vec![result(0, &["not a reference"], &[])];
        let summary = apply_distinctiveness(&mut results, &reference());
        assert_eq!(summary.distinctive_trigrams, 1);
        assert_eq!(summary.unresolved, 1);
        assert!(results[0].matched_ids.is_empty());
    }
}
