//! Optional process-wide observer for scan latency and outcomes.
//!
//! Install a recorder once at startup with [`set_scan_metrics`]; every
//! [`crate::Engine`] in the process reports to it. Without a recorder the
//! hooks cost one uncontended read lock.

use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

use crate::error::CandidateError;

/// Metrics observer for scan stages.
pub trait ScanMetrics: Send + Sync {
    fn record_reference(&self, latency: Duration, tokens: usize);
    fn record_candidate(&self, latency: Duration, result: Result<(), CandidateError>);
    fn record_run(&self, latency: Duration, candidates: usize, failures: usize);
}

/// Install or clear the global scan metrics recorder.
pub fn set_scan_metrics(recorder: Option<Arc<dyn ScanMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn ScanMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn ScanMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn ScanMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Timer bound to the recorder installed when it started.
pub(crate) struct MetricsSpan {
    recorder: Arc<dyn ScanMetrics>,
    start: Instant,
}

impl MetricsSpan {
    pub(crate) fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    pub(crate) fn record_reference(self, tokens: usize) {
        self.recorder.record_reference(self.start.elapsed(), tokens);
    }

    pub(crate) fn record_candidate(self, result: Result<(), CandidateError>) {
        self.recorder.record_candidate(self.start.elapsed(), result);
    }

    pub(crate) fn record_run(self, candidates: usize, failures: usize) {
        self.recorder
            .record_run(self.start.elapsed(), candidates, failures);
    }
}
