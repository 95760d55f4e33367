//! Workspace umbrella crate for plagscan.
//!
//! Ties normalization (`canonical`), reference indexing (`index`) and
//! matching (`matcher`) together behind one async entry point:
//!
//! ```no_run
//! use plagscan::{CandidateDocument, Engine, EngineConfig};
//!
//! # async fn demo() -> Result<(), plagscan::EngineError> {
//! let engine = Engine::new(EngineConfig::default())?;
//! let report = engine
//!     .run(
//!         "the original essay text",
//!         vec![CandidateDocument::new("essay-1", "a submitted essay")],
//!         None,
//!     )
//!     .await?;
//! println!("{}% ({:?})", report.summary.overall_percentage, report.summary.level);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod scheduler;

pub use canonical::{
    from_tokens, tokenize_candidate, tokenize_reference, CanonicalError, NormalizeConfig,
    Stopwords, Token, TokenId,
};
pub use index::{IndexConfig, IndexError, ReferenceIndex, TrigramAttribution};
pub use matcher::{
    CandidateSummary, DisplayColor, DistinctConfig, DistinctSummary, MatchConfig, MatchError,
    MatchResult, MatchStrategy, MatchThreshold, Matcher, PlagiarismLevel, Summary,
};

pub use crate::config::{ConfigLoadError, PlagscanConfig};
pub use crate::error::{CandidateError, EngineError};
pub use crate::metrics::{set_scan_metrics, ScanMetrics};
pub use crate::scheduler::{
    BatchOutcome, CandidateDocument, CandidateFailure, CandidateWork, ProgressEvent, Scheduler,
    SchedulerConfig, UnitState,
};

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, Instrument, Level};

use matcher::{apply_distinctiveness, summarize, Aggregator};

use crate::metrics::MetricsSpan;

/// Configuration for every stage of a scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub normalize: NormalizeConfig,
    pub index: IndexConfig,
    pub matcher: MatchConfig,
    pub distinct: DistinctConfig,
    pub scheduler: SchedulerConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        self.normalize.validate()?;
        self.index.validate()?;
        self.matcher.validate(self.index.window_size)?;
        self.scheduler.validate()?;
        Ok(())
    }
}

/// Final output of a scan.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    #[serde(flatten)]
    pub summary: Summary,
    /// Candidates that produced no result, in submission order.
    pub failures: Vec<CandidateFailure>,
    /// Present when the distinctiveness pass ran.
    pub distinct: Option<DistinctSummary>,
}

impl Report {
    /// Reference id -> submission index of the first candidate matching it.
    pub fn attribution(&self) -> BTreeMap<TokenId, usize> {
        self.summary.attribution()
    }
}

/// Runs scans with one fixed configuration.
#[derive(Debug, Clone)]
pub struct Engine {
    cfg: EngineConfig,
    stopwords: Stopwords,
}

impl Engine {
    pub fn new(cfg: EngineConfig) -> Result<Self, EngineError> {
        cfg.validate()?;
        let stopwords = Stopwords::from_config(&cfg.normalize);
        Ok(Self { cfg, stopwords })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Normalize reference text and build its indices.
    pub fn prepare_reference(&self, text: &str) -> Result<Arc<ReferenceIndex>, EngineError> {
        if text.trim().is_empty() {
            return Err(EngineError::InputValidation(
                "reference text is empty".into(),
            ));
        }
        let tokens = match tokenize_reference(text, &self.cfg.normalize) {
            Err(CanonicalError::EmptyInput) => {
                return Err(EngineError::InputValidation(
                    "reference has no tokens after normalization".into(),
                ))
            }
            other => other?,
        };
        self.prepare_reference_tokens(&tokens)
    }

    /// Build indices from an already tokenized reference stream.
    pub fn prepare_reference_tokens(
        &self,
        tokens: &[Token],
    ) -> Result<Arc<ReferenceIndex>, EngineError> {
        if tokens.is_empty() {
            return Err(EngineError::InputValidation(
                "reference token stream is empty".into(),
            ));
        }
        let metrics = MetricsSpan::start();
        let reference = ReferenceIndex::build(tokens, &self.stopwords, &self.cfg.index)?;
        if let Some(span) = metrics {
            span.record_reference(reference.token_count());
        }
        Ok(Arc::new(reference))
    }

    /// Prepare `reference` and scan `candidates` against it.
    pub async fn run(
        &self,
        reference: &str,
        candidates: Vec<CandidateDocument>,
        progress: Option<UnboundedSender<ProgressEvent>>,
    ) -> Result<Report, EngineError> {
        validate_candidates(&candidates)?;
        let reference = self.prepare_reference(reference)?;
        self.run_prepared(reference, candidates, progress).await
    }

    /// Scan `candidates` against an already built reference index.
    pub async fn run_prepared(
        &self,
        reference: Arc<ReferenceIndex>,
        candidates: Vec<CandidateDocument>,
        progress: Option<UnboundedSender<ProgressEvent>>,
    ) -> Result<Report, EngineError> {
        validate_candidates(&candidates)?;
        let submitted = candidates.len();
        let span = tracing::span!(
            Level::INFO,
            "plagscan.run",
            reference_tokens = reference.token_count(),
            candidates = submitted
        );

        self.scan(reference, candidates, progress)
            .instrument(span)
            .await
    }

    async fn scan(
        &self,
        reference: Arc<ReferenceIndex>,
        candidates: Vec<CandidateDocument>,
        progress: Option<UnboundedSender<ProgressEvent>>,
    ) -> Result<Report, EngineError> {
        let submitted = candidates.len();
        let start = Instant::now();
        let metrics = MetricsSpan::start();

        let shared = Matcher::new(
            Arc::clone(&reference),
            self.cfg.normalize.clone(),
            self.cfg.index.clone(),
            self.cfg.matcher.clone(),
        )?;
        let scheduler = Scheduler::new(self.cfg.scheduler.clone())?;
        let outcome = scheduler
            .run(Arc::new(shared), candidates, progress)
            .await;

        let mut aggregator = Aggregator::new();
        for result in outcome.results {
            aggregator.absorb(result);
        }
        let mut results = aggregator.into_results();

        let distinct = if self.cfg.distinct.applies_to(submitted) {
            Some(apply_distinctiveness(&mut results, reference.trigrams()))
        } else {
            None
        };

        let summary = summarize(&results, reference.token_count());
        info!(
            overall_percentage = summary.overall_percentage,
            plagiarism_level = ?summary.level,
            succeeded = results.len(),
            failed = outcome.failures.len(),
            distinct_ids_added = distinct.as_ref().map(|d| d.ids_added).unwrap_or(0),
            elapsed_micros = start.elapsed().as_micros(),
            "run_complete"
        );
        if let Some(span) = metrics {
            span.record_run(submitted, outcome.failures.len());
        }

        Ok(Report {
            summary,
            failures: outcome.failures,
            distinct,
        })
    }
}

fn validate_candidates(candidates: &[CandidateDocument]) -> Result<(), EngineError> {
    if candidates.is_empty() {
        return Err(EngineError::InputValidation(
            "no candidates submitted".into(),
        ));
    }
    let mut seen = HashSet::with_capacity(candidates.len());
    for doc in candidates {
        if doc.id.trim().is_empty() {
            return Err(EngineError::InputValidation(
                "candidate id must not be empty".into(),
            ));
        }
        if !seen.insert(doc.id.as_str()) {
            return Err(EngineError::InputValidation(format!(
                "duplicate candidate id {:?}",
                doc.id
            )));
        }
    }
    Ok(())
}
