//! Orchestration of a full scoring run.

pub mod analysis;

pub use analysis::{AnalysisReport, AnalysisRun};
