//! Word trigram dictionary over a stopword-filtered stream.
//!
//! Each trigram is stored twice: under its key (the three contents
//! concatenated without separator), which decides entry identity, and by its
//! readable space-joined text, which is what candidate sets contain. Two
//! different phrases can share a key ("ab c d" and "a bc d"); the later one
//! then lives in the readable set but never gets an entry of its own.

use fxhash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use canonical::{Stopwords, Token, TokenId};

use crate::config::TrigramAttribution;

/// Set of readable trigram texts.
pub type TrigramSet = FxHashSet<String>;

/// One dictionary entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrigramEntry {
    pub key: String,
    pub readable_text: String,
    /// Ids of the three origin tokens; more with
    /// [`TrigramAttribution::AllOccurrences`].
    pub word_ids: Vec<TokenId>,
}

/// Trigram dictionary plus the set of all distinct readable trigrams.
#[derive(Debug, Clone, Default)]
pub struct TrigramIndex {
    entries: Vec<TrigramEntry>,
    by_key: FxHashMap<String, usize>,
    by_readable: FxHashMap<String, usize>,
    readable: TrigramSet,
}

impl TrigramIndex {
    /// Build the dictionary over an already stopword-filtered stream.
    pub fn build(tokens: &[Token], attribution: TrigramAttribution) -> Self {
        let mut index = Self::default();
        if tokens.len() < 3 {
            return index;
        }

        for tri in tokens.windows(3) {
            let key = format!("{}{}{}", tri[0].content, tri[1].content, tri[2].content);
            let readable = readable_text(&tri[0].content, &tri[1].content, &tri[2].content);
            let ids = [tri[0].id, tri[1].id, tri[2].id];

            index.readable.insert(readable.clone());

            match index.by_key.get(&key) {
                Some(&pos) => {
                    if attribution == TrigramAttribution::AllOccurrences {
                        index.entries[pos].word_ids.extend_from_slice(&ids);
                    }
                }
                None => {
                    let pos = index.entries.len();
                    index.by_key.insert(key.clone(), pos);
                    index.by_readable.entry(readable.clone()).or_insert(pos);
                    index.entries.push(TrigramEntry {
                        key,
                        readable_text: readable,
                        word_ids: ids.to_vec(),
                    });
                }
            }
        }
        index
    }

    /// Entries in first-seen order.
    pub fn entries(&self) -> &[TrigramEntry] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&TrigramEntry> {
        self.by_key.get(key).map(|&pos| &self.entries[pos])
    }

    /// Resolve a readable trigram to its entry, if it owns one.
    pub fn lookup_readable(&self, readable: &str) -> Option<&TrigramEntry> {
        self.by_readable.get(readable).map(|&pos| &self.entries[pos])
    }

    /// All distinct readable trigrams, including ones that lost a key
    /// collision.
    pub fn readable_set(&self) -> &TrigramSet {
        &self.readable
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn readable_text(a: &str, b: &str, c: &str) -> String {
    let mut out = String::with_capacity(a.len() + b.len() + c.len() + 2);
    out.push_str(a);
    out.push(' ');
    out.push_str(b);
    out.push(' ');
    out.push_str(c);
    out
}

/// Readable trigram set of a candidate stream, after stopword removal.
pub fn candidate_trigrams(tokens: &[Token], stopwords: &Stopwords) -> TrigramSet {
    let words: Vec<&str> = tokens
        .iter()
        .map(|t| t.content.as_str())
        .filter(|w| !stopwords.contains(w))
        .collect();

    if words.len() < 3 {
        return TrigramSet::default();
    }
    words
        .windows(3)
        .map(|w| readable_text(w[0], w[1], w[2]))
        .collect()
}
