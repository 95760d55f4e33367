//! plagscan canonical text layer.
//!
//! This crate turns raw extracted text into ordered `(id, content)` token
//! streams that every downstream stage (windows, trigrams, matching) addresses
//! by id.
//!
//! ## What we do
//!
//! - Unicode NFD decomposition and removal of combining marks
//! - ASCII alphanumeric filtering and lowercasing
//! - Whitespace collapsing
//! - Positional tokenization with stable ids
//! - Stopword filtering that keeps the surviving tokens' ids
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no OS/locale dependence. Same text and config give
//! the same tokens on any machine.
//!
//! ## Ids
//!
//! Reference ids are positional over the raw whitespace-separated words, so a
//! word that normalizes to nothing leaves a gap instead of shifting its
//! neighbours. Candidate ids are dense because nothing outside the engine
//! ever addresses them.

mod config;
mod error;
mod pipeline;
mod stopwords;
mod token;

pub use crate::config::NormalizeConfig;
pub use crate::error::CanonicalError;
pub use crate::pipeline::{from_tokens, normalize_word, tokenize_candidate, tokenize_reference};
pub use crate::stopwords::{Stopwords, ENGLISH_STOPWORDS};
pub use crate::token::{Token, TokenId};
