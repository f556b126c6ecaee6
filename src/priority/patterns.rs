//! Codebase-scope pattern findings.
//!
//! Patterns describe the codebase as a whole and are reported next to the
//! focus verdict, never instead of it.

use crate::config::PatternsConfig;
use crate::core::{
    CodebaseSnapshot, Evidence, FindingKind, PatternFinding, PatternKind, Severity,
};
use crate::mismatch::{Congruence, PairAssessment};
use crate::risk::ActionabilityScore;
use crate::stats::{OwnershipBand, ScatterBand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Graph-level figures computed upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureSignals {
    /// Newman modularity `Q` of the dependency graph
    #[serde(default)]
    pub modularity: Option<f64>,
    #[serde(default)]
    pub cycle_count: Option<usize>,
}

/// Everything the aggregator reads. Scores carry the per-file findings.
#[derive(Debug, Clone, Copy)]
pub struct PatternInput<'a> {
    pub snapshot: &'a CodebaseSnapshot,
    pub architecture: &'a ArchitectureSignals,
    pub scores: &'a [ActionabilityScore],
    pub pairs: &'a [PairAssessment],
}

pub struct PatternAggregator<'a> {
    config: &'a PatternsConfig,
}

impl<'a> PatternAggregator<'a> {
    pub fn new(config: &'a PatternsConfig) -> Self {
        Self { config }
    }

    /// Every pattern that fires, in `PatternKind` order.
    pub fn aggregate(&self, input: PatternInput<'_>) -> Vec<PatternFinding> {
        let mut patterns: Vec<PatternFinding> = [
            self.low_modularity(input.architecture),
            dependency_cycles(input.architecture),
            self.widespread_wrong_abstraction(input),
            self.pervasive_congruence(input.pairs, Congruence::CoordinationOverhead),
            self.pervasive_congruence(input.pairs, Congruence::MissingCoordination),
            scattered_changes(input.snapshot),
            self.knowledge_concentration(input.snapshot),
        ]
        .into_iter()
        .flatten()
        .collect();
        patterns.sort_by_key(|p| p.kind);
        patterns
    }

    fn low_modularity(&self, architecture: &ArchitectureSignals) -> Option<PatternFinding> {
        let q = architecture.modularity.filter(|q| q.is_finite())?;
        (q < self.config.modularity_threshold).then(|| PatternFinding {
            kind: PatternKind::LowModularity,
            severity: Severity::Medium,
            evidence: vec![
                Evidence::named("modularity", q),
                Evidence::named("threshold", self.config.modularity_threshold),
            ],
            files: Vec::new(),
        })
    }

    fn widespread_wrong_abstraction(&self, input: PatternInput<'_>) -> Option<PatternFinding> {
        let mut files: Vec<PathBuf> = input
            .scores
            .iter()
            .filter(|s| {
                s.findings
                    .iter()
                    .any(|f| f.kind == FindingKind::WrongAbstraction)
            })
            .map(|s| s.path.clone())
            .collect();
        files.sort();
        let severity = self.mismatch_severity(files.len(), input.scores.len())?;
        Some(PatternFinding {
            kind: PatternKind::WidespreadWrongAbstraction,
            severity,
            evidence: proportion_evidence(files.len(), input.scores.len()),
            files,
        })
    }

    fn pervasive_congruence(
        &self,
        pairs: &[PairAssessment],
        label: Congruence,
    ) -> Option<PatternFinding> {
        let kind = match label {
            Congruence::CoordinationOverhead => PatternKind::PervasiveCoordinationOverhead,
            Congruence::MissingCoordination => PatternKind::PervasiveMissingCoordination,
            Congruence::Aligned => return None,
        };
        let matching: Vec<&PairAssessment> =
            pairs.iter().filter(|p| p.congruence == label).collect();
        let severity = self.mismatch_severity(matching.len(), pairs.len())?;
        let mut files: Vec<PathBuf> = matching
            .iter()
            .flat_map(|p| [p.a.clone(), p.b.clone()])
            .collect();
        files.sort();
        files.dedup();
        Some(PatternFinding {
            kind,
            severity,
            evidence: proportion_evidence(matching.len(), pairs.len()),
            files,
        })
    }

    /// `None` unless both the count and the proportion minimums are met.
    fn mismatch_severity(&self, count: usize, total: usize) -> Option<Severity> {
        if total == 0 || count < self.config.min_mismatch_count {
            return None;
        }
        let proportion = count as f64 / total as f64;
        if proportion < self.config.min_mismatch_proportion {
            return None;
        }
        Some(if proportion >= 2.0 * self.config.min_mismatch_proportion {
            Severity::High
        } else {
            Severity::Medium
        })
    }

    fn knowledge_concentration(&self, snapshot: &CodebaseSnapshot) -> Option<PatternFinding> {
        // a lone author owns everything; nothing is concentrated
        if snapshot.author_count() <= 1 {
            return None;
        }
        let hotspots: Vec<_> = snapshot
            .files()
            .iter()
            .filter(|f| snapshot.is_hotspot(f))
            .collect();
        let files: Vec<PathBuf> = hotspots
            .iter()
            .filter(|f| f.ownership.band == OwnershipBand::Critical)
            .map(|f| f.signals.path.clone())
            .collect();
        if hotspots.is_empty() || files.len() < self.config.knowledge_concentration_min_files {
            return None;
        }
        let share = files.len() as f64 / hotspots.len() as f64;
        (share >= self.config.knowledge_concentration_share).then(|| PatternFinding {
            kind: PatternKind::KnowledgeConcentration,
            severity: Severity::High,
            evidence: proportion_evidence(files.len(), hotspots.len()),
            files,
        })
    }
}

fn dependency_cycles(architecture: &ArchitectureSignals) -> Option<PatternFinding> {
    let cycles = architecture.cycle_count.filter(|&c| c > 0)?;
    Some(PatternFinding {
        kind: PatternKind::DependencyCycles,
        severity: Severity::Medium,
        evidence: vec![Evidence::named("cycle_count", cycles as f64)],
        files: Vec::new(),
    })
}

fn scattered_changes(snapshot: &CodebaseSnapshot) -> Option<PatternFinding> {
    let window = snapshot.latest_active_window()?;
    (window.scatter.band == ScatterBand::HighScatter).then(|| PatternFinding {
        kind: PatternKind::ScatteredChanges,
        severity: Severity::Medium,
        evidence: vec![
            Evidence::named("scatter_ratio", window.scatter.ratio),
            Evidence::named("files_changed", window.files_changed as f64),
        ],
        files: Vec::new(),
    })
}

fn proportion_evidence(count: usize, total: usize) -> Vec<Evidence> {
    vec![
        Evidence::named("count", count as f64),
        Evidence::named("proportion", count as f64 / total as f64),
    ]
}
