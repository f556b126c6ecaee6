use crate::core::metrics::Metric;
use crate::stats::{StrategyBoundaries, TrajectoryThresholds};
use serde::{Deserialize, Serialize};

/// `[thresholds]` section: strategy boundaries, fixed per-metric thresholds,
/// percentile floors and churn trajectory cut-offs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    /// Below this many files only fixed thresholds are used
    #[serde(default = "default_absolute_below")]
    pub absolute_below: usize,

    /// From this many files on, ranks are purely empirical
    #[serde(default = "default_full_from")]
    pub full_from: usize,

    #[serde(default)]
    pub absolute: AbsoluteThresholds,

    #[serde(default)]
    pub floors: PercentileFloors,

    #[serde(default)]
    pub trajectory: TrajectoryConfig,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            absolute_below: default_absolute_below(),
            full_from: default_full_from(),
            absolute: AbsoluteThresholds::default(),
            floors: PercentileFloors::default(),
            trajectory: TrajectoryConfig::default(),
        }
    }
}

impl ThresholdsConfig {
    pub fn boundaries(&self) -> StrategyBoundaries {
        StrategyBoundaries {
            absolute_below: self.absolute_below,
            full_from: self.full_from,
        }
    }

    pub fn trajectory_thresholds(&self) -> TrajectoryThresholds {
        TrajectoryThresholds {
            slope: self.trajectory.slope,
            cv: self.trajectory.cv,
        }
    }
}

fn default_absolute_below() -> usize {
    15
}

fn default_full_from() -> usize {
    50
}

/// Fixed thresholds used when a codebase is too small for percentiles.
///
/// For high-is-good metrics (coverage, bus factor) the threshold is the
/// value below which a file is a concern. `None` disables the metric under
/// fixed thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsoluteThresholds {
    #[serde(default = "default_lines")]
    pub lines: Option<f64>,
    #[serde(default = "default_cyclomatic")]
    pub cyclomatic_complexity: Option<f64>,
    #[serde(default = "default_cognitive")]
    pub cognitive_complexity: Option<f64>,
    #[serde(default = "default_coupling")]
    pub efferent_coupling: Option<f64>,
    #[serde(default = "default_coupling")]
    pub afferent_coupling: Option<f64>,
    #[serde(default = "default_test_coverage")]
    pub test_coverage: Option<f64>,
    #[serde(default = "default_pagerank")]
    pub pagerank: Option<f64>,
    #[serde(default = "default_blast_radius")]
    pub blast_radius_size: Option<f64>,
    #[serde(default = "default_total_changes")]
    pub total_changes: Option<f64>,
    #[serde(default = "default_bus_factor")]
    pub bus_factor: Option<f64>,
}

impl Default for AbsoluteThresholds {
    fn default() -> Self {
        Self {
            lines: default_lines(),
            cyclomatic_complexity: default_cyclomatic(),
            cognitive_complexity: default_cognitive(),
            efferent_coupling: default_coupling(),
            afferent_coupling: default_coupling(),
            test_coverage: default_test_coverage(),
            pagerank: default_pagerank(),
            blast_radius_size: default_blast_radius(),
            total_changes: default_total_changes(),
            bus_factor: default_bus_factor(),
        }
    }
}

impl AbsoluteThresholds {
    pub fn for_metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Lines => self.lines,
            Metric::CyclomaticComplexity => self.cyclomatic_complexity,
            Metric::CognitiveComplexity => self.cognitive_complexity,
            Metric::EfferentCoupling => self.efferent_coupling,
            Metric::AfferentCoupling => self.afferent_coupling,
            Metric::TestCoverage => self.test_coverage,
            Metric::Pagerank => self.pagerank,
            Metric::BlastRadius => self.blast_radius_size,
            Metric::TotalChanges => self.total_changes,
            Metric::BusFactor => self.bus_factor,
        }
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (Metric, Option<f64>)> + '_ {
        Metric::ALL.into_iter().map(|m| (m, self.for_metric(m)))
    }
}

fn default_lines() -> Option<f64> {
    Some(500.0)
}

fn default_cyclomatic() -> Option<f64> {
    Some(15.0)
}

fn default_cognitive() -> Option<f64> {
    Some(15.0)
}

fn default_coupling() -> Option<f64> {
    Some(10.0)
}

fn default_test_coverage() -> Option<f64> {
    Some(0.5)
}

fn default_pagerank() -> Option<f64> {
    Some(0.05)
}

fn default_blast_radius() -> Option<f64> {
    Some(10.0)
}

fn default_total_changes() -> Option<f64> {
    Some(20.0)
}

fn default_bus_factor() -> Option<f64> {
    Some(3.0)
}

/// Raw values below a floor rank 0 whenever percentiles are in use, so a
/// tightly clustered tail of tiny values cannot rank high.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileFloors {
    #[serde(default = "default_floors_enabled")]
    pub enabled: bool,
    #[serde(default = "default_pagerank_floor")]
    pub pagerank: f64,
    #[serde(default = "default_blast_radius_floor")]
    pub blast_radius_size: f64,
    #[serde(default = "default_lines_floor")]
    pub lines: f64,
}

impl Default for PercentileFloors {
    fn default() -> Self {
        Self {
            enabled: default_floors_enabled(),
            pagerank: default_pagerank_floor(),
            blast_radius_size: default_blast_radius_floor(),
            lines: default_lines_floor(),
        }
    }
}

impl PercentileFloors {
    pub fn for_metric(&self, metric: Metric) -> Option<f64> {
        if !self.enabled {
            return None;
        }
        match metric {
            Metric::Pagerank => Some(self.pagerank),
            Metric::BlastRadius => Some(self.blast_radius_size),
            Metric::Lines => Some(self.lines),
            _ => None,
        }
    }
}

fn default_floors_enabled() -> bool {
    true
}

fn default_pagerank_floor() -> f64 {
    0.005
}

fn default_blast_radius_floor() -> f64 {
    5.0
}

fn default_lines_floor() -> f64 {
    100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryConfig {
    /// Minimum |slope| (changes per month) that counts as a trend
    #[serde(default = "default_slope")]
    pub slope: f64,
    /// Coefficient of variation separating erratic from steady
    #[serde(default = "default_cv")]
    pub cv: f64,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            slope: default_slope(),
            cv: default_cv(),
        }
    }
}

fn default_slope() -> f64 {
    0.1
}

fn default_cv() -> f64 {
    0.5
}
