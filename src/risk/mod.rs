//! Per-file composite scoring.
//!
//! [`CompositeScorer`] turns a file's ranks and findings into three numbers:
//! `risk_score` (hotspots only), `hotspot_score`, and `actionability`, the
//! value files are ranked by.

pub mod scorer;

pub use scorer::{
    ActionabilityScore, CompositeScorer, Discount, HotspotBreakdown, RiskBreakdown, ScoreBreakdown,
};
