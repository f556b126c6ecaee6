use serde::{Deserialize, Serialize};

use super::detection::DetectorsConfig;
use super::scoring::ScoringConfig;
use super::thresholds::ThresholdsConfig;

/// Root configuration structure for riskmap.
///
/// Every section and field has a default, so an empty `.riskmap.toml` is
/// equivalent to no file at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskmapConfig {
    #[serde(default)]
    pub thresholds: ThresholdsConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub focus: FocusConfig,

    #[serde(default)]
    pub patterns: PatternsConfig,

    #[serde(default)]
    pub detectors: DetectorsConfig,
}

/// `[focus]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Maximum number of alternatives listed after the focus point
    #[serde(default = "default_alternatives")]
    pub alternatives: usize,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            alternatives: default_alternatives(),
        }
    }
}

fn default_alternatives() -> usize {
    5
}

/// `[patterns]` section: when codebase-scope findings fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternsConfig {
    /// Modularity below this means no meaningful community structure
    #[serde(default = "default_modularity_threshold")]
    pub modularity_threshold: f64,

    /// Minimum number of files sharing a mismatch label
    #[serde(default = "default_min_mismatch_count")]
    pub min_mismatch_count: usize,

    /// Minimum share of files (or pairs) sharing a mismatch label
    #[serde(default = "default_min_mismatch_proportion")]
    pub min_mismatch_proportion: f64,

    /// Share of hotspot files with a single effective owner
    #[serde(default = "default_concentration_share")]
    pub knowledge_concentration_share: f64,

    #[serde(default = "default_concentration_min_files")]
    pub knowledge_concentration_min_files: usize,
}

impl Default for PatternsConfig {
    fn default() -> Self {
        Self {
            modularity_threshold: default_modularity_threshold(),
            min_mismatch_count: default_min_mismatch_count(),
            min_mismatch_proportion: default_min_mismatch_proportion(),
            knowledge_concentration_share: default_concentration_share(),
            knowledge_concentration_min_files: default_concentration_min_files(),
        }
    }
}

fn default_modularity_threshold() -> f64 {
    0.3
}

fn default_min_mismatch_count() -> usize {
    3
}

fn default_min_mismatch_proportion() -> f64 {
    0.1
}

fn default_concentration_share() -> f64 {
    0.5
}

fn default_concentration_min_files() -> usize {
    3
}
