//! Thread-local context tracking for scoring runs.
//!
//! - Thread-local context: each thread has its own context (via `thread_local!`)
//! - Global progress: atomic counters for files scored/total
//! - Context guards use RAII for automatic cleanup on drop

use serde::Serialize;
use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static FILES_PROCESSED: AtomicUsize = AtomicUsize::new(0);
static FILES_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<AnalysisContext> = const { RefCell::new(AnalysisContext::new()) };
}

/// What the engine was doing on this thread.
#[derive(Debug, Clone, Default)]
pub struct AnalysisContext {
    pub phase: Option<AnalysisPhase>,
    pub current_file: Option<PathBuf>,
}

impl AnalysisContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_file: None,
        }
    }
}

impl std::fmt::Display for AnalysisContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.phase, &self.current_file) {
            (Some(phase), Some(file)) => write!(f, "{phase} ({})", file.display()),
            (Some(phase), None) => write!(f, "{phase}"),
            (None, Some(file)) => write!(f, "{}", file.display()),
            (None, None) => write!(f, "idle"),
        }
    }
}

/// Phases of a scoring run, in execution order.
///
/// `SignalValidation` and `Aggregation` make up the global phase and always
/// finish before any per-file work starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisPhase {
    /// Checking raw signal records
    SignalValidation,
    /// Building distribution tables, medians and the strategy choice
    Aggregation,
    /// Per-file detectors and composite scoring
    FileScoring,
    /// Pairwise coupling and congruence checks
    PairAnalysis,
    /// Focus point selection
    Prioritization,
    /// Codebase-level pattern roll-up
    PatternAggregation,
}

impl std::fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SignalValidation => write!(f, "signal_validation"),
            Self::Aggregation => write!(f, "aggregation"),
            Self::FileScoring => write!(f, "file_scoring"),
            Self::PairAnalysis => write!(f, "pair_analysis"),
            Self::Prioritization => write!(f, "prioritization"),
            Self::PatternAggregation => write!(f, "pattern_aggregation"),
        }
    }
}

/// Restores the previous context when dropped.
pub struct ContextGuard {
    previous: AnalysisContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

/// Set the current phase; the previous one comes back when the guard drops.
#[must_use]
pub fn set_phase(phase: AnalysisPhase) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().phase = Some(phase);
        ContextGuard { previous }
    })
}

/// Set the file currently being scored on this thread.
#[must_use]
pub fn set_current_file(path: impl Into<PathBuf>) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().current_file = Some(path.into());
        ContextGuard { previous }
    })
}

pub fn set_progress(processed: usize, total: usize) {
    FILES_PROCESSED.store(processed, Ordering::Relaxed);
    FILES_TOTAL.store(total, Ordering::Relaxed);
}

/// Thread-safe; called from rayon workers.
pub fn increment_processed() {
    FILES_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn get_current_context() -> AnalysisContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// (processed, total)
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        FILES_PROCESSED.load(Ordering::Relaxed),
        FILES_TOTAL.load(Ordering::Relaxed),
    )
}

#[cfg(test)]
pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = AnalysisContext::new();
    });
}
