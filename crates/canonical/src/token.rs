use serde::{Deserialize, Serialize};

/// Positional identifier of a token inside one document's stream.
pub type TokenId = u32;

/// A normalized token and its stable positional id.
///
/// Tokens are created once during normalization and never mutated; every
/// downstream attribution (windows, trigrams, match sets) refers back to
/// `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Token {
    pub id: TokenId,
    /// Normalized content: non-empty, ASCII alphanumeric, no whitespace.
    pub content: String,
}

impl Token {
    pub fn new(id: TokenId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.content.as_str()
    }
}
