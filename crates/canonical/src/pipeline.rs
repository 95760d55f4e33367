use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;

use crate::config::NormalizeConfig;
use crate::error::CanonicalError;
use crate::token::{Token, TokenId};

/// Combining diacritical marks block stripped after NFD decomposition.
const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036F}';

/// Normalize a word or a whole text blob into comparable content.
///
/// Whitespace runs collapse to one ASCII space and the result is trimmed, so
/// a single raw word always normalizes to zero or one token.
pub fn normalize_word(text: &str, cfg: &NormalizeConfig) -> String {
    // Decomposition first: it splits accented letters into base + mark.
    let decomposed: Cow<str> = if cfg.strip_diacritics {
        Cow::Owned(text.nfd().collect::<String>())
    } else {
        Cow::Borrowed(text)
    };

    let mut out = String::with_capacity(decomposed.len());
    let mut pending_space = false;

    for ch in decomposed.chars() {
        if ch.is_whitespace() {
            if !out.is_empty() {
                pending_space = true;
            }
            continue;
        }
        if COMBINING_MARKS.contains(&ch) || !ch.is_ascii_alphanumeric() {
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(if cfg.lowercase {
            ch.to_ascii_lowercase()
        } else {
            ch
        });
    }

    out
}

/// Tokenize reference text with positional ids.
///
/// Every whitespace-separated raw word consumes one id. Words that normalize
/// to nothing (pure punctuation, symbols, non-Latin scripts) are dropped and
/// leave a gap, so ids of surviving words never shift.
pub fn tokenize_reference(text: &str, cfg: &NormalizeConfig) -> Result<Vec<Token>, CanonicalError> {
    cfg.validate()?;

    let mut tokens = Vec::with_capacity(text.len() / 5 + 1);
    for (position, raw) in text.split_whitespace().enumerate() {
        let content = normalize_word(raw, cfg);
        if !content.is_empty() {
            tokens.push(Token::new(position as TokenId, content));
        }
    }

    if tokens.is_empty() {
        return Err(CanonicalError::EmptyInput);
    }
    Ok(tokens)
}

/// Tokenize a candidate text blob: normalize the whole blob, then split.
///
/// Ids are dense `0..n`.
pub fn tokenize_candidate(text: &str, cfg: &NormalizeConfig) -> Result<Vec<Token>, CanonicalError> {
    cfg.validate()?;

    let normalized = normalize_word(text, cfg);
    let tokens: Vec<Token> = normalized
        .split(' ')
        .filter(|w| !w.is_empty())
        .enumerate()
        .map(|(id, w)| Token::new(id as TokenId, w))
        .collect();

    if tokens.is_empty() {
        return Err(CanonicalError::EmptyInput);
    }
    Ok(tokens)
}

/// Accept an already tokenized stream (for example from a document extractor
/// that assigns its own ids) and re-normalize its contents.
///
/// Ids must be strictly increasing. Entries whose content normalizes to
/// nothing are dropped. A raw entry that normalizes to several words keeps
/// only its first word, since one id can address only one token.
pub fn from_tokens<I, S>(raw: I, cfg: &NormalizeConfig) -> Result<Vec<Token>, CanonicalError>
where
    I: IntoIterator<Item = (TokenId, S)>,
    S: AsRef<str>,
{
    cfg.validate()?;

    let mut tokens = Vec::new();
    let mut previous: Option<TokenId> = None;
    for (id, content) in raw {
        if let Some(prev) = previous {
            if id <= prev {
                return Err(CanonicalError::NonMonotonicIds {
                    previous: prev,
                    next: id,
                });
            }
        }
        previous = Some(id);

        let normalized = normalize_word(content.as_ref(), cfg);
        if let Some(first) = normalized.split(' ').find(|w| !w.is_empty()) {
            tokens.push(Token::new(id, first));
        }
    }

    if tokens.is_empty() {
        return Err(CanonicalError::EmptyInput);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> NormalizeConfig {
        NormalizeConfig::default()
    }

    #[test]
    fn normalize_strips_marks_and_symbols() {
        assert_eq!(normalize_word("Crème-Brûlée!", &cfg()), "cremebrulee");
        assert_eq!(normalize_word("  100%  sure ", &cfg()), "100 sure");
        assert_eq!(normalize_word("línea\tnueva\r\nfin", &cfg()), "linea nueva fin");
    }

    #[test]
    fn normalize_without_diacritic_stripping_drops_accented_letters() {
        let cfg = NormalizeConfig::new().with_strip_diacritics(false);
        assert_eq!(normalize_word("café", &cfg), "caf");
    }

    #[test]
    fn normalize_preserves_case_when_asked() {
        let cfg = NormalizeConfig::new().with_lowercase(false);
        assert_eq!(normalize_word("Hello World", &cfg), "Hello World");
    }

    #[test]
    fn non_latin_words_leave_id_gaps() {
        let tokens = tokenize_reference("alpha 東京 beta", &cfg()).unwrap();
        let ids: Vec<TokenId> = tokens.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn candidate_ids_are_dense() {
        let tokens = tokenize_candidate("one -- two ?? three", &cfg()).unwrap();
        let pairs: Vec<(TokenId, &str)> = tokens.iter().map(|t| (t.id, t.content.as_str())).collect();
        assert_eq!(pairs, vec![(0, "one"), (1, "two"), (2, "three")]);
    }

    #[test]
    fn from_tokens_renormalizes_and_keeps_ids() {
        let raw = vec![(3, "Hello,"), (7, "***"), (9, "WORLD")];
        let tokens = from_tokens(raw, &cfg()).unwrap();
        assert_eq!(tokens, vec![Token::new(3, "hello"), Token::new(9, "world")]);
    }

    #[test]
    fn from_tokens_rejects_non_monotonic_ids() {
        let raw = vec![(1, "a"), (1, "b")];
        assert_eq!(
            from_tokens(raw, &cfg()),
            Err(CanonicalError::NonMonotonicIds { previous: 1, next: 1 })
        );
    }

    #[test]
    fn tokenization_is_deterministic() {
        let text = "Plagiarism detection needs stable, repeatable ids.";
        let a = tokenize_reference(text, &cfg()).unwrap();
        let b = tokenize_reference(text, &cfg()).unwrap();
        assert_eq!(a, b);
    }
}
