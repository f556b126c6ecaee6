//! Per-file finders.
//!
//! Each detector looks at one file of a [`CodebaseSnapshot`] and emits zero
//! or more [`Finding`]s. Their count feeds the findings term of
//! actionability. Detectors that need snapshot-wide preparation (outlier
//! fences) do it once in their constructor; `detect` is then a cheap,
//! read-only lookup that is safe to call from many threads.

use crate::config::RiskmapConfig;
use crate::core::{CodebaseSnapshot, Finding, FindingKind, Metric};
use crate::mismatch::AlignmentDetector;

pub mod churn;
pub mod outliers;
pub mod ownership;

pub use churn::UnstableFileDetector;
pub use outliers::{OutlierDetector, OutlierMode};
pub use ownership::KnowledgeSiloDetector;

pub trait FileDetector: Send + Sync {
    fn detector_name(&self) -> &'static str;

    /// Findings for the file at `idx` in `snapshot`.
    fn detect(&self, snapshot: &CodebaseSnapshot, idx: usize) -> Vec<Finding>;
}

/// The detectors run on every file, prepared for one snapshot.
pub struct DetectorSet {
    detectors: Vec<Box<dyn FileDetector>>,
}

impl DetectorSet {
    pub fn standard(snapshot: &CodebaseSnapshot, config: &RiskmapConfig) -> Self {
        let shape_aware = config.detectors.shape_aware_outliers;
        let detectors: Vec<Box<dyn FileDetector>> = vec![
            Box::new(OutlierDetector::prepare(
                snapshot,
                Metric::CyclomaticComplexity,
                FindingKind::ComplexityOutlier,
                shape_aware,
            )),
            Box::new(OutlierDetector::prepare(
                snapshot,
                Metric::Lines,
                FindingKind::SizeOutlier,
                shape_aware,
            )),
            Box::new(KnowledgeSiloDetector::new(
                config.detectors.silo_pagerank_rank,
            )),
            Box::new(UnstableFileDetector),
            Box::new(AlignmentDetector::new(config.detectors.mismatch_gap)),
        ];
        Self { detectors }
    }

    pub fn new(detectors: Vec<Box<dyn FileDetector>>) -> Self {
        Self { detectors }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.detector_name()).collect()
    }

    pub fn detect(&self, snapshot: &CodebaseSnapshot, idx: usize) -> Vec<Finding> {
        self.detectors
            .iter()
            .flat_map(|d| d.detect(snapshot, idx))
            .collect()
    }
}
