//! Composite per-file scores.
//!
//! Every composite is built from ranks and bounded health terms, so units
//! never mix: `risk_score` is a weighted sum of percentile-style ranks,
//! `hotspot_score` and `actionability` are products.

use crate::config::ScoringConfig;
use crate::core::{CodebaseSnapshot, FileProfile, Finding, Metric};
use crate::priority::score_types::Score0To1;
use serde::Serialize;
use std::path::PathBuf;

/// Terms of `risk_score`. All zero for a file that is not a hotspot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RiskBreakdown {
    /// `total_changes` above the snapshot median
    pub eligible: bool,
    pub structural: f64,
    pub temporal: f64,
    pub coupling: f64,
    pub ownership: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HotspotBreakdown {
    pub change_rank: f64,
    pub complexity_health: f64,
    pub coupling_health: f64,
    pub test_coverage: f64,
    pub code_health: f64,
    pub score: f64,
}

/// A multiplicative penalty that was applied, for explanations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Discount {
    Orphan,
    LargeFile,
    NoChangeHistory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub risk: RiskBreakdown,
    pub hotspot: HotspotBreakdown,
    pub pagerank_rank: f64,
    pub blast_radius_term: f64,
    pub findings_term: f64,
    pub discounts: Vec<Discount>,
}

/// Per-file verdict. `actionability = risk × impact × tractability ×
/// confidence`, each factor in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionabilityScore {
    pub path: PathBuf,
    pub risk_score: f64,
    pub hotspot_score: f64,
    pub risk: Score0To1,
    pub impact: Score0To1,
    pub tractability: Score0To1,
    pub confidence: Score0To1,
    pub actionability: Score0To1,
    /// Raw pagerank, second tie-breaker in rankings
    pub pagerank: f64,
    pub breakdown: ScoreBreakdown,
    pub findings: Vec<Finding>,
}

impl ActionabilityScore {
    pub fn value(&self) -> f64 {
        self.actionability.value()
    }

    /// Changed more often than the median file.
    pub fn is_hotspot(&self) -> bool {
        self.breakdown.risk.eligible
    }
}

pub struct CompositeScorer<'a> {
    snapshot: &'a CodebaseSnapshot,
    config: &'a ScoringConfig,
}

impl<'a> CompositeScorer<'a> {
    pub fn new(snapshot: &'a CodebaseSnapshot, config: &'a ScoringConfig) -> Self {
        Self { snapshot, config }
    }

    pub fn risk_score(&self, profile: &FileProfile) -> RiskBreakdown {
        if !self.snapshot.is_hotspot(profile) {
            return RiskBreakdown::default();
        }
        let weights = &self.config.risk;
        let structural = weights.structural * self.snapshot.rank_of(Metric::Pagerank, profile);
        let temporal = weights.temporal * self.snapshot.rank_of(Metric::TotalChanges, profile);
        let coupling = weights.coupling * self.snapshot.rank_of(Metric::EfferentCoupling, profile);
        let ownership = weights.ownership * (1.0 - profile.ownership.health);
        RiskBreakdown {
            eligible: true,
            structural,
            temporal,
            coupling,
            ownership,
            total: (structural + temporal + coupling + ownership).clamp(0.0, 1.0),
        }
    }

    pub fn hotspot_score(&self, profile: &FileProfile) -> HotspotBreakdown {
        let hotspot = &self.config.hotspot;
        let signals = &profile.signals;
        let change_rank = self.snapshot.rank_of(Metric::TotalChanges, profile);
        let complexity_health = 1.0
            - (f64::from(signals.cyclomatic_complexity) / hotspot.complexity_saturation).min(1.0);
        let coupling_health =
            1.0 - (f64::from(signals.efferent_coupling) / hotspot.coupling_saturation).min(1.0);
        let code_health = (complexity_health + coupling_health + signals.test_coverage) / 3.0;
        HotspotBreakdown {
            change_rank,
            complexity_health,
            coupling_health,
            test_coverage: signals.test_coverage,
            code_health,
            score: (change_rank * (1.0 - code_health)).clamp(0.0, 1.0),
        }
    }

    /// Score one file given the findings attributed to it.
    pub fn actionability(&self, profile: &FileProfile, findings: Vec<Finding>) -> ActionabilityScore {
        let a = &self.config.actionability;
        let signals = &profile.signals;
        let risk_breakdown = self.risk_score(profile);
        let hotspot = self.hotspot_score(profile);

        let findings_term = (findings.len() as f64 / a.findings_saturation).min(1.0);
        let risk = Score0To1::new(
            a.risk_score_weight * risk_breakdown.total + a.findings_weight * findings_term,
        );

        let pagerank_rank = self.snapshot.rank_of(Metric::Pagerank, profile);
        let blast_radius_term =
            (signals.blast_radius_size as f64 / a.blast_radius_saturation).min(1.0);
        let impact = Score0To1::new((pagerank_rank + blast_radius_term) / 2.0);

        let mut discounts = Vec::new();
        let mut tractability = Score0To1::ONE;
        if signals.is_orphan {
            tractability = tractability.discounted(a.orphan_discount);
            discounts.push(Discount::Orphan);
        }
        if signals.lines > a.large_file_lines {
            tractability = tractability.discounted(a.large_file_discount);
            discounts.push(Discount::LargeFile);
        }

        let mut confidence = Score0To1::ONE;
        if signals.total_changes == 0 {
            confidence = confidence.discounted(a.no_history_discount);
            discounts.push(Discount::NoChangeHistory);
        }

        ActionabilityScore {
            path: signals.path.clone(),
            risk_score: risk_breakdown.total,
            hotspot_score: hotspot.score,
            risk,
            impact,
            tractability,
            confidence,
            actionability: risk * impact * tractability * confidence,
            pagerank: signals.pagerank,
            breakdown: ScoreBreakdown {
                risk: risk_breakdown,
                hotspot,
                pagerank_rank,
                blast_radius_term,
                findings_term,
                discounts,
            },
            findings,
        }
    }
}
