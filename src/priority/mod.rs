//! Prioritization: from per-file scores to a recommendation.
//!
//! - [`focus`] picks the focus point and its alternatives.
//! - [`patterns`] reports codebase-scope findings alongside it.
//! - [`score_types`] holds the clamped score type every sub-score uses.

pub mod focus;
pub mod patterns;
pub mod score_types;

pub use focus::{compare_actionability, rank_scores, FocusSelector, FocusVerdict};
pub use patterns::{ArchitectureSignals, PatternAggregator, PatternInput};
pub use score_types::Score0To1;
