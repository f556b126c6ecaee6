//! Statistical primitives: strategy selection, percentile ranking and
//! outlier fences, entropy, churn trajectories.

pub mod churn;
pub mod entropy;
pub mod percentile;
pub mod strategy;

pub use churn::{ChurnProfile, Trajectory, TrajectoryThresholds};
pub use entropy::{
    bus_factor, bus_factor_health, shannon_entropy, ChangeScatter, Ownership, OwnershipBand,
    ScatterBand,
};
pub use percentile::{
    classify_outliers, classify_outliers_for_shape, percentile_rank, Distribution,
    FallbackReason, OutlierFences, OutlierMethod, OutlierReport, Quartiles,
};
pub use strategy::{
    MetricScale, RiskLevel, StrategyBoundaries, StrategyRow, ThresholdStrategy, STRATEGY_TABLE,
};
