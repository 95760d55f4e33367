//! Stopword filtering for the trigram subsystem.
//!
//! Function words carry almost no authorship signal and would make nearly
//! every trigram of an English text look shared, so the trigram index and
//! candidate trigram sets are built over stopword-filtered streams. The
//! windowed matcher works on the unfiltered stream.

use fxhash::FxHashSet;

use crate::config::NormalizeConfig;
use crate::token::Token;

/// Built-in English stopword list.
///
/// Entries with apostrophes never match normalized content (the normalizer
/// removes apostrophes); they are kept so the list stays a drop-in for the
/// common English list.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "ain", "al", "all", "am", "an",
    "and", "any", "are", "aren", "aren't", "as", "at", "be", "because", "been",
    "before", "being", "below", "between", "both", "but", "by", "can", "couldn",
    "couldn't", "d", "did", "didn", "didn't", "do", "does", "doesn", "doesn't",
    "doing", "don", "don't", "down", "during", "each", "et", "few", "for", "from",
    "further", "had", "hadn", "hadn't", "has", "hasn", "hasn't", "have", "haven",
    "haven't", "having", "he", "her", "here", "hers", "herself", "him", "himself",
    "his", "how", "i", "if", "in", "into", "is", "isn", "isn't", "it", "it's", "its",
    "itself", "just", "ll", "m", "ma", "me", "mightn", "mightn't", "more", "most",
    "mustn", "mustn't", "my", "myself", "needn", "needn't", "no", "nor", "not", "now",
    "o", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves",
    "out", "over", "own", "re", "s", "same", "shan", "shan't", "she", "she's",
    "should", "should've", "shouldn", "shouldn't", "so", "some", "such", "t", "than",
    "that", "that'll", "the", "their", "theirs", "them", "themselves", "there",
    "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "ve", "very", "was", "wasn", "wasn't", "we", "were", "weren", "weren't", "what",
    "when", "where", "which", "while", "who", "whom", "why", "will", "with", "won",
    "won't", "wouldn", "wouldn't", "y", "you", "you'd", "you'll", "you're", "you've",
    "your", "yours", "yourself", "yourselves",
];

/// A stopword set with O(1) lookups.
#[derive(Debug, Clone)]
pub struct Stopwords {
    words: FxHashSet<String>,
}

impl Stopwords {
    /// The built-in English list.
    pub fn english() -> Self {
        Self {
            words: ENGLISH_STOPWORDS.iter().map(|w| (*w).to_string()).collect(),
        }
    }

    /// The English list plus `cfg.extra_stopwords`, normalized the same way
    /// token content is.
    pub fn from_config(cfg: &NormalizeConfig) -> Self {
        let mut set = Self::english();
        for word in &cfg.extra_stopwords {
            let normalized = crate::pipeline::normalize_word(word, cfg);
            if !normalized.is_empty() {
                set.words.insert(normalized);
            }
        }
        set
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Drop stopword tokens, keeping the ids of the survivors.
    pub fn strip(&self, tokens: &[Token]) -> Vec<Token> {
        tokens
            .iter()
            .filter(|t| !self.contains(&t.content))
            .cloned()
            .collect()
    }
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_list_size() {
        assert_eq!(ENGLISH_STOPWORDS.len(), 180);
        assert_eq!(Stopwords::english().len(), 180);
    }

    #[test]
    fn extra_stopwords_are_normalized() {
        let cfg = NormalizeConfig::new().with_extra_stopwords(["Figure", "Ibíd."]);
        let set = Stopwords::from_config(&cfg);
        assert!(set.contains("figure"));
        assert!(set.contains("ibid"));
        assert!(set.contains("the"));
    }

    #[test]
    fn strip_on_all_stopwords_is_empty() {
        let tokens = vec![Token::new(0, "the"), Token::new(1, "of"), Token::new(2, "and")];
        assert!(Stopwords::english().strip(&tokens).is_empty());
    }
}
