//! Risk and actionability scoring for per-file code-health signals.
//!
//! A run takes pre-computed signals for every file of a codebase (size,
//! complexity, coupling, coverage, dependency-graph position, change history,
//! authorship), ranks each signal against the codebase itself, and answers
//! one question: which file should be worked on first, and why.
//!
//! ```no_run
//! use riskmap::builders::AnalysisRun;
//! use riskmap::config::RiskmapConfig;
//! use riskmap::io::read_bundle;
//! use std::path::Path;
//!
//! # fn main() -> riskmap::errors::Result<()> {
//! let bundle = read_bundle(Path::new("signals.json"))?;
//! let report = AnalysisRun::new(RiskmapConfig::default()).run(bundle)?;
//! if let Some(focus) = report.focus.focus() {
//!     println!("start with {}", focus.path.display());
//! }
//! # Ok(())
//! # }
//! ```

// Export modules for library usage
pub mod builders;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod detectors;
pub mod effects;
pub mod errors;
pub mod io;
pub mod mismatch;
pub mod observability;
pub mod priority;
pub mod risk;
pub mod stats;

// Re-export commonly used types
pub use crate::builders::{AnalysisReport, AnalysisRun};
pub use crate::config::RiskmapConfig;
pub use crate::core::{
    CodebaseSnapshot, FileSignals, FileSignalsInput, Finding, FindingKind, PatternFinding,
    PatternKind, Severity,
};
pub use crate::errors::{DataError, Error, Result};
pub use crate::io::{OutputFormat, SignalBundle};
pub use crate::priority::{FocusVerdict, Score0To1};
pub use crate::risk::ActionabilityScore;
