use serde::Serialize;
use thiserror::Error;

use canonical::CanonicalError;
use index::IndexError;
use matcher::MatchError;

/// Errors that stop a scan before or instead of producing a report.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InputValidation(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("reference normalization failed: {0}")]
    Canonical(#[from] CanonicalError),
    #[error("reference index failed: {0}")]
    Index(#[from] IndexError),
    #[error("matcher setup failed: {0}")]
    Match(#[from] MatchError),
}

/// Why a single candidate produced no result. Never fatal to the run.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CandidateError {
    #[error("candidate text is empty after normalization")]
    EmptyText,
    #[error("matching failed: {message}")]
    Matching { message: String },
    #[error("worker for unit {unit} panicked")]
    WorkerPanicked { unit: usize },
    #[error("unit {unit} exceeded {after_ms}ms and was terminated")]
    Timeout { unit: usize, after_ms: u64 },
    #[error("outcome of unit {unit} was lost")]
    Transport { unit: usize },
}

impl From<MatchError> for CandidateError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::Canonical(CanonicalError::EmptyInput) => CandidateError::EmptyText,
            other => CandidateError::Matching {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_candidate_maps_to_empty_text() {
        let err = MatchError::Canonical(CanonicalError::EmptyInput);
        assert_eq!(CandidateError::from(err), CandidateError::EmptyText);
    }

    #[test]
    fn other_match_errors_keep_their_message() {
        let err = MatchError::MalformedWindow {
            index: 2,
            ids: 3,
            contents: 1,
        };
        let CandidateError::Matching { message } = CandidateError::from(err) else {
            panic!("expected Matching");
        };
        assert!(message.contains("window 2"));
    }

    #[test]
    fn transport_serializes_with_unit() {
        let json = serde_json::to_value(CandidateError::Transport { unit: 4 }).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "transport", "unit": 4}));
    }
}
