use serde::{Deserialize, Serialize};

/// `[detectors]` section: cut-offs for per-file and pairwise detectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorsConfig {
    /// Minimum |pagerank rank - churn rank| for a structural-temporal mismatch
    #[serde(default = "default_mismatch_gap")]
    pub mismatch_gap: f64,

    /// Co-change support above which an unexplained pair is hidden coupling
    #[serde(default = "default_hidden_coupling_support")]
    pub hidden_coupling_support: f64,

    /// Technical distance beyond which two files are "far apart"
    #[serde(default = "default_far_distance")]
    pub far_distance: f64,

    /// Distance below which two files are "close"
    #[serde(default = "default_near_distance")]
    pub near_distance: f64,

    /// Pagerank rank a single-owner hotspot must exceed to be a knowledge silo
    #[serde(default = "default_silo_pagerank_rank")]
    pub silo_pagerank_rank: f64,

    /// Decline IQR fences for metrics with a heavy-tailed expected shape or
    /// too few distinct values
    #[serde(default = "default_shape_aware_outliers")]
    pub shape_aware_outliers: bool,
}

impl Default for DetectorsConfig {
    fn default() -> Self {
        Self {
            mismatch_gap: default_mismatch_gap(),
            hidden_coupling_support: default_hidden_coupling_support(),
            far_distance: default_far_distance(),
            near_distance: default_near_distance(),
            silo_pagerank_rank: default_silo_pagerank_rank(),
            shape_aware_outliers: default_shape_aware_outliers(),
        }
    }
}

fn default_mismatch_gap() -> f64 {
    0.3
}

fn default_hidden_coupling_support() -> f64 {
    0.3
}

fn default_far_distance() -> f64 {
    3.0
}

fn default_near_distance() -> f64 {
    2.0
}

fn default_silo_pagerank_rank() -> f64 {
    0.75
}

fn default_shape_aware_outliers() -> bool {
    true
}
