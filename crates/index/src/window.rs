//! Sliding k-token windows.
//!
//! A window is the unit of local overlap comparison. Contents repeated inside
//! one window are collapsed to their first occurrence, which lowers the
//! number of entries the threshold test counts against.

use fxhash::FxHashSet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use canonical::{Token, TokenId};

/// One content-deduplicated window.
///
/// Invariant: `ids.len() == contents.len()`, `ids[i]` is the id of the first
/// token in the span whose content is `contents[i]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Window {
    pub ids: Vec<TokenId>,
    pub contents: Vec<String>,
}

impl Window {
    /// Build a window from a contiguous token span.
    pub fn from_span(span: &[Token]) -> Self {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut ids = Vec::with_capacity(span.len());
        let mut contents = Vec::with_capacity(span.len());
        for token in span {
            if seen.insert(token.content.as_str()) {
                ids.push(token.id);
                contents.push(token.content.clone());
            }
        }
        Self { ids, contents }
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn is_well_formed(&self) -> bool {
        self.ids.len() == self.contents.len()
    }

    /// Content set used when this window is on the candidate side.
    pub fn content_set(&self) -> FxHashSet<&str> {
        self.contents.iter().map(String::as_str).collect()
    }
}

/// Build one window per start offset `0..=n-k`.
///
/// A stream shorter than `k` yields a single window over the whole stream;
/// an empty stream yields none.
pub fn build_windows(tokens: &[Token], k: usize) -> Vec<Window> {
    build_windows_strided(tokens, k, 1)
}

/// Like [`build_windows`], but only every `stride`-th start offset.
pub fn build_windows_strided(tokens: &[Token], k: usize, stride: usize) -> Vec<Window> {
    let n = tokens.len();
    if n == 0 || k == 0 {
        return Vec::new();
    }
    if n < k {
        return vec![Window::from_span(tokens)];
    }
    (0..=n - k)
        .step_by(stride.max(1))
        .map(|start| Window::from_span(&tokens[start..start + k]))
        .collect()
}

/// Rayon-parallel [`build_windows`]; output order and contents are identical.
pub fn build_windows_parallel(tokens: &[Token], k: usize) -> Vec<Window> {
    let n = tokens.len();
    if n == 0 || k == 0 {
        return Vec::new();
    }
    if n < k {
        return vec![Window::from_span(tokens)];
    }
    (0..=n - k)
        .into_par_iter()
        .map(|start| Window::from_span(&tokens[start..start + k]))
        .collect()
}
