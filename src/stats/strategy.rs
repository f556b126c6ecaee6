//! Sample-size-aware threshold strategies.
//!
//! A run picks one [`ThresholdStrategy`] from its file count. Every metric
//! evaluation then goes through [`STRATEGY_TABLE`], which maps the strategy
//! to a ranking function and a classification function. Formulas ask the
//! table for a rank; they never branch on the strategy themselves.
//!
//! - `ABSOLUTE` (tiny codebases): fixed thresholds only. The rank is a prior
//!   derived from the threshold, which maps onto the "top 25%" boundary.
//! - `BAYESIAN` (small codebases): the prior blended with the empirical
//!   percentile rank, the prior's weight shrinking linearly to zero.
//! - `FULL`: empirical percentile rank alone.

use super::percentile::Distribution;
use crate::core::metrics::Polarity;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThresholdStrategy {
    Absolute,
    Bayesian,
    Full,
}

/// File counts at which the strategy changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyBoundaries {
    /// Below this many files: `ABSOLUTE`
    pub absolute_below: usize,
    /// From this many files on: `FULL`
    pub full_from: usize,
}

impl Default for StrategyBoundaries {
    fn default() -> Self {
        Self {
            absolute_below: 15,
            full_from: 50,
        }
    }
}

impl StrategyBoundaries {
    /// Weight of the threshold prior in a blended rank: 1 at or below
    /// `absolute_below`, falling linearly to 0 at `full_from`.
    pub fn prior_weight(&self, file_count: usize) -> f64 {
        if file_count <= self.absolute_below {
            1.0
        } else if file_count >= self.full_from {
            0.0
        } else {
            let span = (self.full_from - self.absolute_below) as f64;
            (self.full_from - file_count) as f64 / span
        }
    }
}

impl ThresholdStrategy {
    /// Strategy for `file_count` with the default 15 / 50 boundaries.
    pub fn select(file_count: usize) -> Self {
        Self::select_with(file_count, StrategyBoundaries::default())
    }

    pub fn select_with(file_count: usize, boundaries: StrategyBoundaries) -> Self {
        if file_count < boundaries.absolute_below {
            Self::Absolute
        } else if file_count < boundaries.full_from {
            Self::Bayesian
        } else {
            Self::Full
        }
    }

    pub fn row(self) -> &'static StrategyRow {
        match self {
            Self::Absolute => &STRATEGY_TABLE[0],
            Self::Bayesian => &STRATEGY_TABLE[1],
            Self::Full => &STRATEGY_TABLE[2],
        }
    }

    /// Effective rank of `value` in [0, 1], higher raw value → higher rank.
    pub fn rank(self, value: f64, scale: &MetricScale<'_>) -> f64 {
        (self.row().rank)(value, scale).clamp(0.0, 1.0)
    }

    pub fn classify(self, value: f64, scale: &MetricScale<'_>) -> RiskLevel {
        (self.row().classify)(value, scale)
    }

    /// Whether `value` is notably high for its metric: above the fixed
    /// threshold under `ABSOLUTE`, above `rank_cut` otherwise. A metric with
    /// no fixed threshold never exceeds under `ABSOLUTE`.
    pub fn exceeds(self, value: f64, scale: &MetricScale<'_>, rank_cut: f64) -> bool {
        match self {
            Self::Absolute => scale.threshold.is_some_and(|t| value > t),
            Self::Bayesian | Self::Full => self.rank(value, scale) > rank_cut,
        }
    }
}

impl fmt::Display for ThresholdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Absolute => "ABSOLUTE",
            Self::Bayesian => "BAYESIAN",
            Self::Full => "FULL",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    None,
    Low,
    Moderate,
    High,
}

/// Everything a strategy needs to evaluate one metric.
#[derive(Debug, Clone, Copy)]
pub struct MetricScale<'a> {
    pub distribution: &'a Distribution,
    pub polarity: Polarity,
    /// Fixed threshold for the metric, if one is configured
    pub threshold: Option<f64>,
    /// Values below the floor rank 0 when percentiles are in use
    pub floor: Option<f64>,
    pub prior_weight: f64,
}

type RankFn = fn(f64, &MetricScale<'_>) -> f64;
type ClassifyFn = fn(f64, &MetricScale<'_>) -> RiskLevel;

pub struct StrategyRow {
    pub strategy: ThresholdStrategy,
    pub rank: RankFn,
    pub classify: ClassifyFn,
}

pub const STRATEGY_TABLE: [StrategyRow; 3] = [
    StrategyRow {
        strategy: ThresholdStrategy::Absolute,
        rank: absolute_rank,
        classify: absolute_classify,
    },
    StrategyRow {
        strategy: ThresholdStrategy::Bayesian,
        rank: bayesian_rank,
        classify: bayesian_classify,
    },
    StrategyRow {
        strategy: ThresholdStrategy::Full,
        rank: full_rank,
        classify: full_classify,
    },
];

const HIGH_BAND: f64 = 0.90;
const MODERATE_BAND: f64 = 0.75;
const LOW_BAND: f64 = 0.50;

fn below_floor(value: f64, scale: &MetricScale<'_>) -> bool {
    scale.floor.is_some_and(|floor| value < floor)
}

/// Rank a fixed threshold implies for `value`.
///
/// The threshold sits at 0.75 for metrics where high values stand out and
/// at 0.25 for high-is-good metrics, where the threshold marks the bottom
/// quarter. `None` without a usable threshold.
fn prior_rank(value: f64, scale: &MetricScale<'_>) -> Option<f64> {
    let threshold = scale.threshold.filter(|t| *t > 0.0)?;
    let anchor = match scale.polarity {
        Polarity::HighGood => 0.25,
        Polarity::HighBad | Polarity::ContextDependent => 0.75,
    };
    let value = value.max(0.0);
    let rank = if value <= threshold {
        anchor * value / threshold
    } else {
        anchor + (1.0 - anchor) * ((value - threshold) / threshold).min(1.0)
    };
    Some(rank)
}

fn absolute_rank(value: f64, scale: &MetricScale<'_>) -> f64 {
    prior_rank(value, scale).unwrap_or_else(|| scale.distribution.percentile_rank(value))
}

fn full_rank(value: f64, scale: &MetricScale<'_>) -> f64 {
    if below_floor(value, scale) {
        return 0.0;
    }
    scale.distribution.percentile_rank(value)
}

fn bayesian_rank(value: f64, scale: &MetricScale<'_>) -> f64 {
    if below_floor(value, scale) {
        return 0.0;
    }
    let empirical = scale.distribution.percentile_rank(value);
    match prior_rank(value, scale) {
        Some(prior) => {
            let w = scale.prior_weight.clamp(0.0, 1.0);
            w * prior + (1.0 - w) * empirical
        }
        None => empirical,
    }
}

/// Read a rank in the direction where larger means worse.
fn badness(rank: f64, polarity: Polarity) -> f64 {
    match polarity {
        Polarity::HighGood => 1.0 - rank,
        Polarity::HighBad | Polarity::ContextDependent => rank,
    }
}

fn level_from_badness(badness: f64) -> RiskLevel {
    if badness >= HIGH_BAND {
        RiskLevel::High
    } else if badness >= MODERATE_BAND {
        RiskLevel::Moderate
    } else if badness > LOW_BAND {
        RiskLevel::Low
    } else {
        RiskLevel::None
    }
}

fn full_classify(value: f64, scale: &MetricScale<'_>) -> RiskLevel {
    level_from_badness(badness(full_rank(value, scale), scale.polarity))
}

fn bayesian_classify(value: f64, scale: &MetricScale<'_>) -> RiskLevel {
    level_from_badness(badness(bayesian_rank(value, scale), scale.polarity))
}

fn absolute_classify(value: f64, scale: &MetricScale<'_>) -> RiskLevel {
    let Some(t) = scale.threshold else {
        return RiskLevel::None;
    };
    match scale.polarity {
        Polarity::HighGood => {
            if value < t / 2.0 {
                RiskLevel::High
            } else if value < t {
                RiskLevel::Moderate
            } else if value < 2.0 * t {
                RiskLevel::Low
            } else {
                RiskLevel::None
            }
        }
        Polarity::HighBad | Polarity::ContextDependent => {
            if value > 2.0 * t {
                RiskLevel::High
            } else if value > t {
                RiskLevel::Moderate
            } else if value > t / 2.0 {
                RiskLevel::Low
            } else {
                RiskLevel::None
            }
        }
    }
}
