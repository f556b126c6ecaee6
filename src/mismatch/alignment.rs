//! Structural-temporal alignment.
//!
//! A file's position in the dependency graph and its change rate should move
//! together. When centrality far outruns churn the file is a stable hub;
//! when churn far outruns centrality the file is changing like something
//! important without being structured like one.

use crate::core::{CodebaseSnapshot, Evidence, Finding, FindingKind, Metric, Severity};
use crate::detectors::FileDetector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Alignment {
    Aligned,
    /// Central but rarely changed
    StableHub,
    /// Frequently changed but peripheral
    WrongAbstraction,
}

/// Compare a structural rank with a temporal rank. Gaps of exactly `gap`
/// are still aligned.
pub fn classify_alignment(structural_rank: f64, temporal_rank: f64, gap: f64) -> Alignment {
    if (structural_rank - temporal_rank).abs() <= gap {
        Alignment::Aligned
    } else if structural_rank > temporal_rank {
        Alignment::StableHub
    } else {
        Alignment::WrongAbstraction
    }
}

/// Ranks and label for one file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignmentReading {
    pub structural_rank: f64,
    pub temporal_rank: f64,
    pub alignment: Alignment,
}

pub fn assess_alignment(snapshot: &CodebaseSnapshot, idx: usize, gap: f64) -> Option<AlignmentReading> {
    let profile = snapshot.file(idx)?;
    let structural_rank = snapshot.rank_of(Metric::Pagerank, profile);
    let temporal_rank = snapshot.rank_of(Metric::TotalChanges, profile);
    Some(AlignmentReading {
        structural_rank,
        temporal_rank,
        alignment: classify_alignment(structural_rank, temporal_rank, gap),
    })
}

/// Emits `WRONG_ABSTRACTION` findings; stable hubs are healthy.
pub struct AlignmentDetector {
    gap: f64,
}

impl AlignmentDetector {
    pub fn new(gap: f64) -> Self {
        Self { gap }
    }
}

impl FileDetector for AlignmentDetector {
    fn detector_name(&self) -> &'static str {
        "structural_temporal_alignment"
    }

    fn detect(&self, snapshot: &CodebaseSnapshot, idx: usize) -> Vec<Finding> {
        let (Some(profile), Some(reading)) =
            (snapshot.file(idx), assess_alignment(snapshot, idx, self.gap))
        else {
            return Vec::new();
        };
        if reading.alignment != Alignment::WrongAbstraction {
            return Vec::new();
        }

        let severity = if reading.temporal_rank - reading.structural_rank > 2.0 * self.gap {
            Severity::High
        } else {
            Severity::Medium
        };
        vec![Finding::new(FindingKind::WrongAbstraction, severity, profile.path())
            .with_evidence(Evidence::metric(
                Metric::Pagerank,
                profile.signals.pagerank,
                Some(reading.structural_rank),
            ))
            .with_evidence(Evidence::metric(
                Metric::TotalChanges,
                f64::from(profile.signals.total_changes),
                Some(reading.temporal_rank),
            ))]
    }
}
