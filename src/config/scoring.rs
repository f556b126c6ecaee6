use serde::{Deserialize, Serialize};

/// `[scoring]` section: constants of the composite formulas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub risk: RiskWeights,
    #[serde(default)]
    pub hotspot: HotspotConfig,
    #[serde(default)]
    pub actionability: ActionabilityConfig,
}

/// Weights of the four percentile-based terms of `risk_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskWeights {
    /// Weight for the pagerank rank
    #[serde(default = "default_structural_weight")]
    pub structural: f64,
    /// Weight for the total_changes rank
    #[serde(default = "default_temporal_weight")]
    pub temporal: f64,
    /// Weight for the efferent coupling rank
    #[serde(default = "default_coupling_weight")]
    pub coupling: f64,
    /// Weight for `1 - bus_factor_health`
    #[serde(default = "default_ownership_weight")]
    pub ownership: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            structural: default_structural_weight(),
            temporal: default_temporal_weight(),
            coupling: default_coupling_weight(),
            ownership: default_ownership_weight(),
        }
    }
}

impl RiskWeights {
    pub fn is_valid_weight(weight: f64) -> bool {
        (0.0..=1.0).contains(&weight)
    }

    pub fn sum(&self) -> f64 {
        self.structural + self.temporal + self.coupling + self.ownership
    }

    /// Range and sum problems, one message each.
    pub fn collect_issues(&self) -> Vec<String> {
        let mut issues: Vec<String> = [
            ("structural", self.structural),
            ("temporal", self.temporal),
            ("coupling", self.coupling),
            ("ownership", self.ownership),
        ]
        .into_iter()
        .filter(|(_, weight)| !Self::is_valid_weight(*weight))
        .map(|(name, weight)| {
            format!("scoring.risk.{name} weight out of range: {weight} (must be 0.0-1.0)")
        })
        .collect();

        let sum = self.sum();
        if (sum - 1.0).abs() > 0.001 {
            issues.push(format!(
                "scoring.risk weights must sum to 1.0, but sum to {sum:.3}"
            ));
        }
        issues
    }
}

pub fn default_structural_weight() -> f64 {
    0.3
}

pub fn default_temporal_weight() -> f64 {
    0.3
}

pub fn default_coupling_weight() -> f64 {
    0.2
}

pub fn default_ownership_weight() -> f64 {
    0.2
}

/// Saturation points of the code-health terms in `hotspot_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotConfig {
    /// Cyclomatic complexity at which complexity health reaches 0
    #[serde(default = "default_complexity_saturation")]
    pub complexity_saturation: f64,
    /// Efferent coupling at which coupling health reaches 0
    #[serde(default = "default_coupling_saturation")]
    pub coupling_saturation: f64,
}

impl Default for HotspotConfig {
    fn default() -> Self {
        Self {
            complexity_saturation: default_complexity_saturation(),
            coupling_saturation: default_coupling_saturation(),
        }
    }
}

fn default_complexity_saturation() -> f64 {
    30.0
}

fn default_coupling_saturation() -> f64 {
    20.0
}

/// Constants of the `actionability` product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionabilityConfig {
    #[serde(default = "default_half")]
    pub risk_score_weight: f64,
    #[serde(default = "default_half")]
    pub findings_weight: f64,
    /// Finding count at which the findings term saturates
    #[serde(default = "default_findings_saturation")]
    pub findings_saturation: f64,
    /// Blast radius at which the impact term saturates
    #[serde(default = "default_blast_radius_saturation")]
    pub blast_radius_saturation: f64,
    #[serde(default = "default_half")]
    pub orphan_discount: f64,
    #[serde(default = "default_large_file_lines")]
    pub large_file_lines: usize,
    #[serde(default = "default_large_file_discount")]
    pub large_file_discount: f64,
    /// Applied to files with no recorded change
    #[serde(default = "default_no_history_discount")]
    pub no_history_discount: f64,
}

impl Default for ActionabilityConfig {
    fn default() -> Self {
        Self {
            risk_score_weight: default_half(),
            findings_weight: default_half(),
            findings_saturation: default_findings_saturation(),
            blast_radius_saturation: default_blast_radius_saturation(),
            orphan_discount: default_half(),
            large_file_lines: default_large_file_lines(),
            large_file_discount: default_large_file_discount(),
            no_history_discount: default_no_history_discount(),
        }
    }
}

fn default_half() -> f64 {
    0.5
}

fn default_findings_saturation() -> f64 {
    5.0
}

fn default_blast_radius_saturation() -> f64 {
    50.0
}

fn default_large_file_lines() -> usize {
    1000
}

fn default_large_file_discount() -> f64 {
    0.8
}

fn default_no_history_discount() -> f64 {
    0.7
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_risk_weights_are_valid() {
        let weights = RiskWeights::default();
        assert!((weights.sum() - 1.0).abs() < 1e-12);
        assert!(weights.collect_issues().is_empty());
    }

    #[test]
    fn test_risk_weight_issues_accumulate() {
        let weights = RiskWeights {
            structural: 1.4,
            temporal: -0.1,
            ..RiskWeights::default()
        };
        let issues = weights.collect_issues();
        assert_eq!(issues.len(), 3);
        assert!(issues[0].contains("structural"));
        assert!(issues[1].contains("temporal"));
        assert!(issues[2].contains("sum to 1.0"));
    }
}
