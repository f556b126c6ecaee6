//! Focus point selection.
//!
//! Ranks scored files and picks one focus point plus a bounded list of
//! alternatives. Pure over its input: no ranks are recomputed here, and the
//! ordering is total, so repeated runs always agree.

use crate::risk::ActionabilityScore;
use serde::Serialize;
use std::cmp::Ordering;

/// Outcome of focus selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum FocusVerdict {
    Focus {
        focus: ActionabilityScore,
        alternatives: Vec<ActionabilityScore>,
    },
    /// Nothing is worth acting on. `reference` is the lowest-risk file, kept
    /// as a neutral point of comparison and not a recommendation.
    NoCriticalHotspot { reference: Option<ActionabilityScore> },
}

impl FocusVerdict {
    pub fn focus(&self) -> Option<&ActionabilityScore> {
        match self {
            Self::Focus { focus, .. } => Some(focus),
            Self::NoCriticalHotspot { .. } => None,
        }
    }

    pub fn alternatives(&self) -> &[ActionabilityScore] {
        match self {
            Self::Focus { alternatives, .. } => alternatives,
            Self::NoCriticalHotspot { .. } => &[],
        }
    }
}

/// Actionability desc, then risk_score desc, then pagerank desc, then path asc.
pub fn compare_actionability(a: &ActionabilityScore, b: &ActionabilityScore) -> Ordering {
    b.value()
        .total_cmp(&a.value())
        .then_with(|| b.risk_score.total_cmp(&a.risk_score))
        .then_with(|| b.pagerank.total_cmp(&a.pagerank))
        .then_with(|| a.path.cmp(&b.path))
}

/// Sort scores into ranking order.
pub fn rank_scores(scores: &mut [ActionabilityScore]) {
    scores.sort_by(compare_actionability);
}

#[derive(Debug, Clone, Copy)]
pub struct FocusSelector {
    alternatives: usize,
}

impl Default for FocusSelector {
    fn default() -> Self {
        Self { alternatives: 5 }
    }
}

impl FocusSelector {
    pub fn new(alternatives: usize) -> Self {
        Self { alternatives }
    }

    /// Select from `scores` in any order.
    ///
    /// Every file with non-zero actionability is a candidate. A codebase
    /// without a single hotspot gets the positive verdict, as does one where
    /// no file is actionable.
    pub fn select(&self, scores: &[ActionabilityScore]) -> FocusVerdict {
        let mut ranked: Vec<&ActionabilityScore> = if scores.iter().any(|s| s.is_hotspot()) {
            scores.iter().filter(|s| s.value() > 0.0).collect()
        } else {
            Vec::new()
        };
        ranked.sort_by(|a, b| compare_actionability(a, b));

        let Some((focus, rest)) = ranked.split_first() else {
            return FocusVerdict::NoCriticalHotspot {
                reference: lowest_risk(scores).cloned(),
            };
        };

        FocusVerdict::Focus {
            focus: (*focus).clone(),
            alternatives: rest
                .iter()
                .take(self.alternatives)
                .map(|s| (*s).clone())
                .collect(),
        }
    }
}

fn lowest_risk(scores: &[ActionabilityScore]) -> Option<&ActionabilityScore> {
    scores.iter().min_by(|a, b| {
        a.risk_score
            .total_cmp(&b.risk_score)
            .then_with(|| a.path.cmp(&b.path))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::priority::score_types::Score0To1;
    use crate::risk::{HotspotBreakdown, RiskBreakdown, ScoreBreakdown};
    use std::path::PathBuf;

    fn score(path: &str, actionability: f64, risk_score: f64, pagerank: f64) -> ActionabilityScore {
        ActionabilityScore {
            path: PathBuf::from(path),
            risk_score,
            hotspot_score: 0.0,
            risk: Score0To1::new(actionability),
            impact: Score0To1::ONE,
            tractability: Score0To1::ONE,
            confidence: Score0To1::ONE,
            actionability: Score0To1::new(actionability),
            pagerank,
            breakdown: ScoreBreakdown {
                risk: RiskBreakdown {
                    eligible: true,
                    total: risk_score,
                    ..RiskBreakdown::default()
                },
                hotspot: HotspotBreakdown {
                    change_rank: 0.0,
                    complexity_health: 1.0,
                    coupling_health: 1.0,
                    test_coverage: 1.0,
                    code_health: 1.0,
                    score: 0.0,
                },
                pagerank_rank: 0.0,
                blast_radius_term: 0.0,
                findings_term: 0.0,
                discounts: Vec::new(),
            },
            findings: Vec::new(),
        }
    }

    fn paths(scores: &[ActionabilityScore]) -> Vec<&str> {
        scores.iter().map(|s| s.path.to_str().unwrap()).collect()
    }

    #[test]
    fn test_highest_actionability_is_focus() {
        let scores = vec![
            score("a", 0.2, 0.1, 0.1),
            score("b", 0.6, 0.1, 0.1),
            score("c", 0.4, 0.1, 0.1),
        ];
        let verdict = FocusSelector::default().select(&scores);
        assert_eq!(verdict.focus().unwrap().path, PathBuf::from("b"));
        assert_eq!(paths(verdict.alternatives()), vec!["c", "a"]);
    }

    #[test]
    fn test_tie_breaks_are_deterministic() {
        let scores = vec![
            score("d", 0.5, 0.3, 0.1),
            score("c", 0.5, 0.3, 0.2),
            score("b", 0.5, 0.4, 0.0),
            score("a", 0.5, 0.3, 0.1),
        ];
        let verdict = FocusSelector::default().select(&scores);
        assert_eq!(verdict.focus().unwrap().path, PathBuf::from("b"));
        assert_eq!(paths(verdict.alternatives()), vec!["c", "a", "d"]);

        let mut reversed = scores.clone();
        reversed.reverse();
        assert_eq!(FocusSelector::default().select(&reversed), verdict);
    }

    #[test]
    fn test_alternatives_are_bounded_and_exclude_zero() {
        let mut scores: Vec<_> = (0..10)
            .map(|i| score(&format!("f{i}"), 0.1 * f64::from(i), 0.0, 0.0))
            .collect();
        scores.push(score("zero", 0.0, 0.9, 0.9));
        let verdict = FocusSelector::new(3).select(&scores);
        assert_eq!(verdict.focus().unwrap().path, PathBuf::from("f9"));
        assert_eq!(paths(verdict.alternatives()), vec!["f8", "f7", "f6"]);

        let few = FocusSelector::default().select(&scores[..3]);
        assert_eq!(paths(few.alternatives()), vec!["f1"]);
    }

    #[test]
    fn test_all_zero_yields_lowest_risk_reference() {
        let scores = vec![
            score("b", 0.0, 0.2, 0.0),
            score("a", 0.0, 0.2, 0.0),
            score("c", 0.0, 0.5, 0.0),
        ];
        match FocusSelector::default().select(&scores) {
            FocusVerdict::NoCriticalHotspot { reference } => {
                assert_eq!(reference.unwrap().path, PathBuf::from("a"));
            }
            other => panic!("unexpected verdict {other:?}"),
        }
    }

    #[test]
    fn test_quiet_file_with_findings_can_outrank_hotspot() {
        let mut quiet = score("quiet", 0.9, 0.0, 0.9);
        quiet.breakdown.risk = RiskBreakdown::default();
        let scores = vec![score("busy", 0.2, 0.4, 0.1), quiet];
        let verdict = FocusSelector::default().select(&scores);
        assert_eq!(verdict.focus().unwrap().path, PathBuf::from("quiet"));
        assert_eq!(paths(verdict.alternatives()), vec!["busy"]);
    }

    #[test]
    fn test_no_hotspot_anywhere_is_positive_verdict() {
        let mut quiet = score("quiet", 0.9, 0.0, 0.9);
        quiet.breakdown.risk = RiskBreakdown::default();
        match FocusSelector::default().select(&[quiet]) {
            FocusVerdict::NoCriticalHotspot { reference } => {
                assert_eq!(reference.unwrap().path, PathBuf::from("quiet"));
            }
            other => panic!("unexpected verdict {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_is_positive_verdict() {
        assert_eq!(
            FocusSelector::default().select(&[]),
            FocusVerdict::NoCriticalHotspot { reference: None }
        );
    }
}
