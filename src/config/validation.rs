//! Validation with error accumulation for configuration.
//!
//! Every problem in a configuration is collected before reporting, so a user
//! fixing `.riskmap.toml` sees the whole list at once.
//!
//! ```rust
//! use riskmap::config::validation::validate_config;
//! use riskmap::config::RiskmapConfig;
//!
//! assert!(validate_config(&RiskmapConfig::default()).is_success());
//! ```

use crate::effects::{combine_validations, run_validation, validation_from_errors, Validated};
use crate::errors::{Error, Result};

use super::core::{PatternsConfig, RiskmapConfig};
use super::detection::DetectorsConfig;
use super::scoring::{ActionabilityConfig, HotspotConfig, ScoringConfig};
use super::thresholds::ThresholdsConfig;

pub type ConfigValidation<T> = Validated<T, String>;

pub fn validate_config(config: &RiskmapConfig) -> ConfigValidation<()> {
    let validations = vec![
        validate_thresholds(&config.thresholds),
        validate_scoring(&config.scoring),
        validate_patterns(&config.patterns),
        validate_detectors(&config.detectors),
    ];

    combine_validations(validations).map(|_| ())
}

/// Fail-fast form of [`validate_config`].
pub fn validate_config_result(config: &RiskmapConfig) -> Result<()> {
    run_validation(validate_config(config), Error::InvalidConfig)
}

fn fraction_issue(name: &str, value: f64) -> Option<String> {
    (!(0.0..=1.0).contains(&value))
        .then(|| format!("{name} out of range: {value} (must be 0.0-1.0)"))
}

/// Discounts multiply a score; zero would erase it.
fn discount_issue(name: &str, value: f64) -> Option<String> {
    (!(value > 0.0 && value <= 1.0))
        .then(|| format!("{name} must be in (0.0, 1.0], got {value}"))
}

fn positive_issue(name: &str, value: f64) -> Option<String> {
    (!(value.is_finite() && value > 0.0)).then(|| format!("{name} must be positive, got {value}"))
}

fn validate_thresholds(thresholds: &ThresholdsConfig) -> ConfigValidation<()> {
    let mut errors = Vec::new();

    if thresholds.absolute_below >= thresholds.full_from {
        errors.push(format!(
            "thresholds.absolute_below ({}) must be smaller than thresholds.full_from ({})",
            thresholds.absolute_below, thresholds.full_from
        ));
    }

    for (metric, threshold) in thresholds.absolute.entries() {
        if let Some(t) = threshold {
            errors.extend(positive_issue(&format!("thresholds.absolute.{metric}"), t));
        }
    }

    let floors = &thresholds.floors;
    errors.extend(fraction_issue("thresholds.floors.pagerank", floors.pagerank));
    if floors.blast_radius_size < 0.0 {
        errors.push("thresholds.floors.blast_radius_size cannot be negative".to_string());
    }
    if floors.lines < 0.0 {
        errors.push("thresholds.floors.lines cannot be negative".to_string());
    }

    errors.extend(positive_issue(
        "thresholds.trajectory.slope",
        thresholds.trajectory.slope,
    ));
    errors.extend(positive_issue("thresholds.trajectory.cv", thresholds.trajectory.cv));

    validation_from_errors((), errors)
}

fn validate_scoring(scoring: &ScoringConfig) -> ConfigValidation<()> {
    let mut errors = scoring.risk.collect_issues();
    errors.extend(hotspot_issues(&scoring.hotspot));
    errors.extend(actionability_issues(&scoring.actionability));
    validation_from_errors((), errors)
}

fn hotspot_issues(hotspot: &HotspotConfig) -> Vec<String> {
    [
        positive_issue(
            "scoring.hotspot.complexity_saturation",
            hotspot.complexity_saturation,
        ),
        positive_issue(
            "scoring.hotspot.coupling_saturation",
            hotspot.coupling_saturation,
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn actionability_issues(a: &ActionabilityConfig) -> Vec<String> {
    let mut issues: Vec<String> = [
        fraction_issue(
            "scoring.actionability.risk_score_weight",
            a.risk_score_weight,
        ),
        fraction_issue("scoring.actionability.findings_weight", a.findings_weight),
        positive_issue(
            "scoring.actionability.findings_saturation",
            a.findings_saturation,
        ),
        positive_issue(
            "scoring.actionability.blast_radius_saturation",
            a.blast_radius_saturation,
        ),
        discount_issue("scoring.actionability.orphan_discount", a.orphan_discount),
        discount_issue(
            "scoring.actionability.large_file_discount",
            a.large_file_discount,
        ),
        discount_issue(
            "scoring.actionability.no_history_discount",
            a.no_history_discount,
        ),
    ]
    .into_iter()
    .flatten()
    .collect();

    let risk_sum = a.risk_score_weight + a.findings_weight;
    if (risk_sum - 1.0).abs() > 0.001 {
        issues.push(format!(
            "scoring.actionability risk_score_weight + findings_weight must sum to 1.0, but sum to {risk_sum:.3}"
        ));
    }
    issues
}

fn validate_patterns(patterns: &PatternsConfig) -> ConfigValidation<()> {
    let errors: Vec<String> = [
        fraction_issue(
            "patterns.modularity_threshold",
            patterns.modularity_threshold,
        ),
        fraction_issue(
            "patterns.min_mismatch_proportion",
            patterns.min_mismatch_proportion,
        ),
        fraction_issue(
            "patterns.knowledge_concentration_share",
            patterns.knowledge_concentration_share,
        ),
    ]
    .into_iter()
    .flatten()
    .collect();
    validation_from_errors((), errors)
}

fn validate_detectors(detectors: &DetectorsConfig) -> ConfigValidation<()> {
    let mut errors: Vec<String> = [
        fraction_issue("detectors.mismatch_gap", detectors.mismatch_gap),
        fraction_issue(
            "detectors.hidden_coupling_support",
            detectors.hidden_coupling_support,
        ),
        fraction_issue("detectors.silo_pagerank_rank", detectors.silo_pagerank_rank),
        positive_issue("detectors.far_distance", detectors.far_distance),
        positive_issue("detectors.near_distance", detectors.near_distance),
    ]
    .into_iter()
    .flatten()
    .collect();

    if detectors.near_distance > detectors.far_distance {
        errors.push(format!(
            "detectors.near_distance ({}) cannot exceed detectors.far_distance ({})",
            detectors.near_distance, detectors.far_distance
        ));
    }
    validation_from_errors((), errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stillwater::Validation;

    fn issues(config: &RiskmapConfig) -> Vec<String> {
        match validate_config(config) {
            Validation::Success(()) => Vec::new(),
            Validation::Failure(errors) => errors.into_vec(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(issues(&RiskmapConfig::default()).is_empty());
        assert!(validate_config_result(&RiskmapConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_issues_from_every_section() {
        let mut config = RiskmapConfig::default();
        config.thresholds.absolute_below = 60;
        config.scoring.risk.structural = 0.9;
        config.scoring.actionability.orphan_discount = 0.0;
        config.patterns.modularity_threshold = 2.0;
        config.detectors.near_distance = 5.0;

        let found = issues(&config);
        assert!(found.iter().any(|i| i.contains("absolute_below")));
        assert!(found.iter().any(|i| i.contains("sum to 1.0")));
        assert!(found.iter().any(|i| i.contains("orphan_discount")));
        assert!(found.iter().any(|i| i.contains("modularity_threshold")));
        assert!(found.iter().any(|i| i.contains("near_distance")));
    }

    #[test]
    fn test_result_form_carries_all_issues() {
        let mut config = RiskmapConfig::default();
        config.scoring.hotspot.complexity_saturation = 0.0;
        config.scoring.hotspot.coupling_saturation = -1.0;
        match validate_config_result(&config) {
            Err(Error::InvalidConfig(found)) => assert_eq!(found.len(), 2),
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }
}
