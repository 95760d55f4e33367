//! Batched worker pool for candidate matching.
//!
//! Candidates are split, in submission order, into units of `batch_size`.
//! At most `pool_size` units run at once, each on tokio's blocking pool
//! against the same shared [`Matcher`]. Workers report every finished
//! candidate over a channel; the scheduler turns those into
//! [`ProgressEvent`]s and collects unit outcomes as they complete.
//!
//! A failing candidate only fails itself. A panicking or timed-out unit
//! fails the candidates it carried and nothing else. A timed-out unit keeps
//! its pool slot until its blocking thread returns; it is asked to stop
//! before its next candidate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use matcher::{color_for, MatchResult, Matcher};

use crate::error::{CandidateError, EngineError};
use crate::metrics::MetricsSpan;

/// Per-candidate work executed inside a unit.
///
/// [`Matcher`] is the implementation every scan uses.
pub trait CandidateWork: Send + Sync + 'static {
    fn process(
        &self,
        index: usize,
        doc: &CandidateDocument,
    ) -> Result<MatchResult, CandidateError>;
}

impl CandidateWork for Matcher {
    fn process(
        &self,
        index: usize,
        doc: &CandidateDocument,
    ) -> Result<MatchResult, CandidateError> {
        self.match_text(&doc.id, index, color_for(index), &doc.text)
            .map_err(CandidateError::from)
    }
}

/// One document to compare against the reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateDocument {
    pub id: String,
    pub text: String,
}

impl CandidateDocument {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Worker pool shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Maximum number of units in flight.
    pub pool_size: usize,
    /// Candidates per unit.
    pub batch_size: usize,
    /// Wall-clock limit per unit. `None` waits indefinitely.
    pub unit_timeout_ms: Option<u64>,
}

impl SchedulerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_unit_timeout(mut self, timeout: Duration) -> Self {
        self.unit_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.pool_size == 0 {
            return Err(EngineError::InvalidConfig(
                "scheduler.pool_size must be >= 1".into(),
            ));
        }
        if self.batch_size == 0 {
            return Err(EngineError::InvalidConfig(
                "scheduler.batch_size must be >= 1".into(),
            ));
        }
        if self.unit_timeout_ms == Some(0) {
            return Err(EngineError::InvalidConfig(
                "scheduler.unit_timeout_ms must be >= 1 when set".into(),
            ));
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            pool_size: 4,
            batch_size: 2,
            unit_timeout_ms: None,
        }
    }
}

/// Lifecycle of a work unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnitState {
    Idle,
    Dispatched,
    Completed,
    Failed,
    Terminated,
}

impl UnitState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            UnitState::Completed | UnitState::Failed | UnitState::Terminated
        )
    }

    /// Idle -> Dispatched -> {Completed, Failed, Terminated}; terminal states
    /// are final.
    pub fn can_transition_to(self, next: UnitState) -> bool {
        matches!(
            (self, next),
            (UnitState::Idle, UnitState::Dispatched)
                | (
                    UnitState::Dispatched,
                    UnitState::Completed | UnitState::Failed | UnitState::Terminated
                )
        )
    }
}

/// Emitted once per candidate, successful or not, as it finishes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressEvent {
    pub completed: usize,
    pub total: usize,
    pub candidate_id: String,
    pub candidate_index: usize,
    pub succeeded: bool,
}

/// A candidate that produced no result.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CandidateFailure {
    pub candidate_id: String,
    pub candidate_index: usize,
    pub error: CandidateError,
}

/// Everything the pool produced, both in submission order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub results: Vec<MatchResult>,
    pub failures: Vec<CandidateFailure>,
    /// Final state per unit, by unit id.
    pub unit_states: Vec<UnitState>,
}

#[derive(Debug)]
struct WorkUnit {
    id: usize,
    state: UnitState,
    members: Vec<usize>,
}

impl WorkUnit {
    fn advance(&mut self, next: UnitState) {
        if self.state.can_transition_to(next) {
            self.state = next;
        } else {
            warn!(unit = self.id, from = ?self.state, to = ?next, "unit_transition_rejected");
        }
    }
}

enum WorkerEvent {
    CandidateDone { index: usize, succeeded: bool },
    UnitExpired { unit: usize, after_ms: u64 },
}

enum UnitFailure {
    Panicked,
    Cancelled,
    TimedOut(u64),
}

type UnitOutput = Vec<(usize, Result<MatchResult, CandidateError>)>;

/// Runs candidates through a bounded pool of blocking workers.
#[derive(Debug, Clone)]
pub struct Scheduler {
    cfg: SchedulerConfig,
}

impl Scheduler {
    pub fn new(cfg: SchedulerConfig) -> Result<Self, EngineError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.cfg
    }

    /// Process every candidate. Returns once all units have finished, failed
    /// or been terminated.
    pub async fn run<W: CandidateWork>(
        &self,
        work: Arc<W>,
        candidates: Vec<CandidateDocument>,
        progress: Option<UnboundedSender<ProgressEvent>>,
    ) -> BatchOutcome {
        let total = candidates.len();
        let ids: Vec<String> = candidates.iter().map(|c| c.id.clone()).collect();

        let mut units = Vec::new();
        let mut payloads = Vec::new();
        let mut batch = Vec::with_capacity(self.cfg.batch_size);
        for (index, doc) in candidates.into_iter().enumerate() {
            batch.push((index, doc));
            if batch.len() == self.cfg.batch_size {
                payloads.push(std::mem::take(&mut batch));
            }
        }
        if !batch.is_empty() {
            payloads.push(batch);
        }
        for (id, payload) in payloads.iter().enumerate() {
            units.push(WorkUnit {
                id,
                state: UnitState::Idle,
                members: payload.iter().map(|(i, _)| *i).collect(),
            });
        }

        let (events_tx, mut events_rx) = mpsc::unbounded_channel::<WorkerEvent>();
        let mut tracker = ProgressTracker::new(total, ids.clone(), progress);
        let mut outcomes: Vec<Option<Result<MatchResult, CandidateError>>> = vec![None; total];
        let mut pending = payloads.into_iter().enumerate();
        let mut join_set: JoinSet<(usize, Result<UnitOutput, UnitFailure>)> = JoinSet::new();

        loop {
            while join_set.len() < self.cfg.pool_size {
                let Some((unit_id, payload)) = pending.next() else {
                    break;
                };
                units[unit_id].advance(UnitState::Dispatched);
                debug!(unit = unit_id, candidates = payload.len(), "unit_dispatched");
                self.dispatch(&mut join_set, unit_id, payload, &work, &events_tx);
            }
            if join_set.is_empty() {
                break;
            }

            tokio::select! {
                Some(event) = events_rx.recv() => apply_event(event, &units, &mut tracker),
                joined = join_set.join_next() => {
                    // Progress for candidates the unit already finished comes first.
                    while let Ok(event) = events_rx.try_recv() {
                        apply_event(event, &units, &mut tracker);
                    }
                    match joined {
                        Some(Ok((unit_id, Ok(output)))) => {
                            units[unit_id].advance(UnitState::Completed);
                            debug!(unit = unit_id, "unit_completed");
                            for (index, result) in output {
                                outcomes[index] = Some(result);
                            }
                        }
                        Some(Ok((unit_id, Err(failure)))) => {
                            let (state, error) = match failure {
                                UnitFailure::Panicked => (
                                    UnitState::Failed,
                                    CandidateError::WorkerPanicked { unit: unit_id },
                                ),
                                UnitFailure::Cancelled => (
                                    UnitState::Failed,
                                    CandidateError::Transport { unit: unit_id },
                                ),
                                UnitFailure::TimedOut(after_ms) => (
                                    UnitState::Terminated,
                                    CandidateError::Timeout { unit: unit_id, after_ms },
                                ),
                            };
                            units[unit_id].advance(state);
                            warn!(unit = unit_id, error = %error, "unit_failed");
                            for &index in &units[unit_id].members {
                                outcomes[index] = Some(Err(error.clone()));
                                tracker.record(index, false);
                            }
                        }
                        Some(Err(err)) => {
                            error!(error = %err, "unit_supervisor_lost");
                        }
                        None => {}
                    }
                }
            }
        }

        while let Ok(event) = events_rx.try_recv() {
            apply_event(event, &units, &mut tracker);
        }

        let mut outcome = BatchOutcome::default();
        for unit in &mut units {
            if !unit.state.is_terminal() {
                unit.advance(UnitState::Failed);
            }
        }
        for (index, slot) in outcomes.into_iter().enumerate() {
            let result = slot.unwrap_or_else(|| {
                let unit = index / self.cfg.batch_size;
                Err(CandidateError::Transport { unit })
            });
            match result {
                Ok(result) => outcome.results.push(result),
                Err(error) => {
                    tracker.record(index, false);
                    outcome.failures.push(CandidateFailure {
                        candidate_id: ids[index].clone(),
                        candidate_index: index,
                        error,
                    });
                }
            }
        }
        outcome.unit_states = units.iter().map(|u| u.state).collect();
        outcome
    }

    fn dispatch<W: CandidateWork>(
        &self,
        join_set: &mut JoinSet<(usize, Result<UnitOutput, UnitFailure>)>,
        unit_id: usize,
        payload: Vec<(usize, CandidateDocument)>,
        work: &Arc<W>,
        events: &UnboundedSender<WorkerEvent>,
    ) {
        let work = Arc::clone(work);
        let events = events.clone();
        let timeout = self.cfg.unit_timeout_ms;
        let span =
            tracing::debug_span!("plagscan.unit", unit = unit_id, candidates = payload.len());

        join_set.spawn(async move {
            let cancel = Arc::new(AtomicBool::new(false));
            let worker_cancel = Arc::clone(&cancel);
            let worker_events = events.clone();
            let mut handle = tokio::task::spawn_blocking(move || {
                let _entered = span.enter();
                process_unit(&*work, payload, &worker_events, &worker_cancel)
            });

            let joined = match timeout {
                Some(ms) => {
                    match tokio::time::timeout(Duration::from_millis(ms), &mut handle).await {
                        Ok(joined) => joined,
                        Err(_) => {
                            cancel.store(true, Ordering::Relaxed);
                            let _ = events.send(WorkerEvent::UnitExpired {
                                unit: unit_id,
                                after_ms: ms,
                            });
                            // The pool slot is released only once the thread is done.
                            let _ = handle.await;
                            return (unit_id, Err(UnitFailure::TimedOut(ms)));
                        }
                    }
                }
                None => handle.await,
            };
            match joined {
                Ok(output) => (unit_id, Ok(output)),
                Err(err) if err.is_panic() => (unit_id, Err(UnitFailure::Panicked)),
                Err(_) => (unit_id, Err(UnitFailure::Cancelled)),
            }
        });
    }
}

fn apply_event(event: WorkerEvent, units: &[WorkUnit], tracker: &mut ProgressTracker) {
    match event {
        WorkerEvent::CandidateDone { index, succeeded } => tracker.record(index, succeeded),
        WorkerEvent::UnitExpired { unit, after_ms } => {
            warn!(unit, after_ms, "unit_deadline_expired");
            for &index in &units[unit].members {
                tracker.record(index, false);
            }
        }
    }
}

fn process_unit<W: CandidateWork>(
    work: &W,
    payload: Vec<(usize, CandidateDocument)>,
    events: &UnboundedSender<WorkerEvent>,
    cancel: &AtomicBool,
) -> UnitOutput {
    let mut output = Vec::with_capacity(payload.len());
    for (index, doc) in payload {
        if cancel.load(Ordering::Relaxed) {
            debug!(candidate_index = index, "unit_cancelled");
            break;
        }
        let metrics = MetricsSpan::start();
        let result = work.process(index, &doc);

        if let Err(err) = &result {
            warn!(candidate_id = %doc.id, candidate_index = index, error = %err, "candidate_failed");
        }
        if let Some(span) = metrics {
            span.record_candidate(result.as_ref().map(|_| ()).map_err(Clone::clone));
        }
        // The scheduler may have given up on this unit already.
        let _ = events.send(WorkerEvent::CandidateDone {
            index,
            succeeded: result.is_ok(),
        });
        output.push((index, result));
    }
    output
}

struct ProgressTracker {
    total: usize,
    completed: usize,
    reported: Vec<bool>,
    ids: Vec<String>,
    sink: Option<UnboundedSender<ProgressEvent>>,
}

impl ProgressTracker {
    fn new(total: usize, ids: Vec<String>, sink: Option<UnboundedSender<ProgressEvent>>) -> Self {
        Self {
            total,
            completed: 0,
            reported: vec![false; total],
            ids,
            sink,
        }
    }

    /// Report a candidate once; later reports for it are ignored.
    fn record(&mut self, index: usize, succeeded: bool) {
        if std::mem::replace(&mut self.reported[index], true) {
            return;
        }
        self.completed += 1;
        let event = ProgressEvent {
            completed: self.completed,
            total: self.total,
            candidate_id: self.ids[index].clone(),
            candidate_index: index,
            succeeded,
        };
        debug!(
            completed = event.completed,
            total = event.total,
            candidate_id = %event.candidate_id,
            succeeded,
            "candidate_progress"
        );
        if let Some(sink) = &self.sink {
            let _ = sink.send(event);
        }
    }
}
