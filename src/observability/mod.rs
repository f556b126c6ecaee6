//! Diagnostic context for scoring runs.
//!
//! Tracks which phase of a run is executing and which file is being scored,
//! so that errors and log events raised deep inside a detector can say where
//! they came from. Context is thread-local (works with rayon workers); the
//! progress counters are global atomics.
//!
//! ```ignore
//! use riskmap::observability::{set_phase, set_current_file, AnalysisPhase};
//!
//! let _phase = set_phase(AnalysisPhase::FileScoring);
//! for file in snapshot.files() {
//!     let _file = set_current_file(&file.path);
//!     // ...
//! }
//! ```

pub mod context;

pub use context::{
    get_current_context, get_progress, increment_processed, set_current_file, set_phase,
    set_progress, AnalysisContext, AnalysisPhase, ContextGuard,
};
