//! Per-candidate result collection and summary statistics.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use canonical::TokenId;

use crate::palette::DisplayColor;
use crate::types::MatchResult;

/// Coarse similarity band for the overall percentage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlagiarismLevel {
    Low,
    Moderate,
    High,
}

impl PlagiarismLevel {
    /// Below 10 is low, below 25 moderate, anything else high.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage < 10.0 {
            PlagiarismLevel::Low
        } else if percentage < 25.0 {
            PlagiarismLevel::Moderate
        } else {
            PlagiarismLevel::High
        }
    }
}

/// One candidate's line in the summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateSummary {
    pub candidate_id: String,
    pub candidate_index: usize,
    pub display_color: DisplayColor,
    pub matched_ids: BTreeSet<TokenId>,
    /// Share of reference tokens matched by this candidate, two decimals.
    pub percentage: f64,
}

/// Aggregate view over every successful candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub reference_tokens: usize,
    /// Reference ids matched by at least one candidate.
    pub matched_tokens: usize,
    pub overall_percentage: f64,
    pub level: PlagiarismLevel,
    /// In submission order.
    pub candidates: Vec<CandidateSummary>,
}

impl Summary {
    /// Attribute each matched reference id to the first candidate, in
    /// submission order, that matched it.
    pub fn attribution(&self) -> BTreeMap<TokenId, usize> {
        let mut owners = BTreeMap::new();
        for candidate in &self.candidates {
            for &id in &candidate.matched_ids {
                owners.entry(id).or_insert(candidate.candidate_index);
            }
        }
        owners
    }
}

/// Collects worker results regardless of completion order.
#[derive(Debug, Default)]
pub struct Aggregator {
    results: BTreeMap<usize, MatchResult>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one result. A second result for the same candidate position is
    /// merged into the first by id union.
    pub fn absorb(&mut self, result: MatchResult) {
        match self.results.get_mut(&result.candidate_index) {
            Some(existing) => {
                existing.matched_ids.extend(result.matched_ids);
                existing.window_hits += result.window_hits;
                existing.trigram_matches = existing.trigram_matches.max(result.trigram_matches);
                existing.shared_trigrams.extend(result.shared_trigrams);
                existing.shared_trigrams.sort_unstable();
                existing.shared_trigrams.dedup();
            }
            None => {
                self.results.insert(result.candidate_index, result);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Results ordered by submission position.
    pub fn into_results(self) -> Vec<MatchResult> {
        self.results.into_values().collect()
    }
}

/// Compute percentages and the level over final results.
pub fn summarize(results: &[MatchResult], reference_tokens: usize) -> Summary {
    let mut all: BTreeSet<TokenId> = BTreeSet::new();
    let mut candidates = Vec::with_capacity(results.len());
    for result in results {
        all.extend(result.matched_ids.iter().copied());
        candidates.push(CandidateSummary {
            candidate_id: result.candidate_id.clone(),
            candidate_index: result.candidate_index,
            display_color: result.display_color.clone(),
            matched_ids: result.matched_ids.clone(),
            percentage: percentage(result.matched_ids.len(), reference_tokens),
        });
    }
    candidates.sort_by_key(|c| c.candidate_index);

    let overall_percentage = percentage(all.len(), reference_tokens);
    Summary {
        reference_tokens,
        matched_tokens: all.len(),
        overall_percentage,
        level: PlagiarismLevel::from_percentage(overall_percentage),
        candidates,
    }
}

/// `matched / total * 100`, rounded to two decimals. Zero when `total` is.
pub fn percentage(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = matched as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}
