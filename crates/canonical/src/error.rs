use thiserror::Error;

use crate::token::TokenId;

/// Errors that can occur during normalization and tokenization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("input text empty after normalization")]
    EmptyInput,
    #[error("token ids must be strictly increasing (got {next} after {previous})")]
    NonMonotonicIds { previous: TokenId, next: TokenId },
}
