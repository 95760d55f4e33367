//! Trigram set comparison against the reference dictionary.

use std::collections::BTreeSet;

use index::{TrigramIndex, TrigramSet};

use crate::types::TrigramComparison;

/// Compare a candidate's readable trigram set with the reference.
///
/// The exact overlap `|R| + |C| - |R ∪ C|` is computed first; below
/// `threshold` the comparison stops without touching the dictionary and
/// reports the overlap as `match_count`. Otherwise dictionary entries are
/// scanned in first-seen order and the scan ends once as many entries have
/// matched as the overlap allows.
pub fn compare_trigram_sets(
    reference: &TrigramIndex,
    candidate: &TrigramSet,
    threshold: usize,
) -> TrigramComparison {
    let readable = reference.readable_set();
    let union = readable.union(candidate).count();
    let overlap = readable.len() + candidate.len() - union;

    if overlap < threshold {
        return TrigramComparison {
            is_match: false,
            match_count: overlap,
            matched_word_ids: BTreeSet::new(),
        };
    }

    let mut counter = 0;
    let mut matched_word_ids = BTreeSet::new();
    for entry in reference.entries() {
        if candidate.contains(&entry.readable_text) {
            matched_word_ids.extend(entry.word_ids.iter().copied());
            counter += 1;
            if counter == overlap {
                break;
            }
        }
    }

    TrigramComparison {
        is_match: counter >= threshold,
        match_count: counter,
        matched_word_ids,
    }
}

/// Candidate trigrams that also occur in the reference, sorted.
pub fn shared_trigrams(reference: &TrigramIndex, candidate: &TrigramSet) -> Vec<String> {
    let readable = reference.readable_set();
    let mut shared: Vec<String> = candidate
        .iter()
        .filter(|t| readable.contains(t.as_str()))
        .cloned()
        .collect();
    shared.sort_unstable();
    shared
}
