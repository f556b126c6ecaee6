//! Complexity and size outliers.
//!
//! With enough data a file is an outlier when it sits above the Tukey
//! fences of its metric: above the inner fence is `Medium`, above the outer
//! fence `High`. Below-fence values are never findings; a tiny file is not
//! a defect.
//!
//! Fences are abandoned for fixed thresholds (`> t` Medium, `> 2t` High)
//! when the run uses the ABSOLUTE strategy, when the distribution has no
//! spread, or when it has too few distinct values to trust.

use super::FileDetector;
use crate::core::{CodebaseSnapshot, Evidence, Finding, FindingKind, Metric, Severity};
use crate::stats::{
    classify_outliers, classify_outliers_for_shape, OutlierFences, OutlierMethod,
    ThresholdStrategy,
};
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum OutlierMode {
    Fences {
        fences: OutlierFences,
        moderate: HashSet<usize>,
        extreme: HashSet<usize>,
    },
    Absolute {
        threshold: f64,
    },
    /// No fences and no threshold configured
    Disabled,
}

pub struct OutlierDetector {
    metric: Metric,
    kind: FindingKind,
    mode: OutlierMode,
}

impl OutlierDetector {
    /// Decide once, for the whole snapshot, how outliers of `metric` are
    /// recognised.
    pub fn prepare(
        snapshot: &CodebaseSnapshot,
        metric: Metric,
        kind: FindingKind,
        shape_aware: bool,
    ) -> Self {
        let absolute = || match snapshot.thresholds().absolute.for_metric(metric) {
            Some(threshold) => OutlierMode::Absolute { threshold },
            None => OutlierMode::Disabled,
        };

        let mode = if snapshot.strategy() == ThresholdStrategy::Absolute {
            absolute()
        } else {
            let values: Vec<f64> = snapshot.files().iter().map(|f| f.raw(metric)).collect();
            let report = if shape_aware {
                classify_outliers_for_shape(&values, metric.shape())
            } else {
                classify_outliers(&values)
            };
            match (report.method, snapshot.distribution(metric).outlier_fences()) {
                (OutlierMethod::IqrFences, Some(fences)) => {
                    // Only the high side is a concern.
                    let high = |i: &usize| values[*i] > fences.upper;
                    OutlierMode::Fences {
                        fences,
                        moderate: report.moderate.iter().copied().filter(high).collect(),
                        extreme: report.extreme.iter().copied().filter(high).collect(),
                    }
                }
                (method, _) => {
                    debug!(%metric, ?method, "Falling back to absolute outlier threshold");
                    absolute()
                }
            }
        };

        Self { metric, kind, mode }
    }

    pub fn mode(&self) -> &OutlierMode {
        &self.mode
    }
}

impl FileDetector for OutlierDetector {
    fn detector_name(&self) -> &'static str {
        match self.kind {
            FindingKind::ComplexityOutlier => "complexity_outlier",
            FindingKind::SizeOutlier => "size_outlier",
            _ => "outlier",
        }
    }

    fn detect(&self, snapshot: &CodebaseSnapshot, idx: usize) -> Vec<Finding> {
        let Some(profile) = snapshot.file(idx) else {
            return Vec::new();
        };
        let value = profile.raw(self.metric);

        let (severity, bound) = match &self.mode {
            OutlierMode::Fences {
                fences,
                moderate,
                extreme,
            } => {
                if extreme.contains(&idx) {
                    (Severity::High, Evidence::named("extreme_upper_fence", fences.extreme_upper))
                } else if moderate.contains(&idx) {
                    (Severity::Medium, Evidence::named("upper_fence", fences.upper))
                } else {
                    return Vec::new();
                }
            }
            OutlierMode::Absolute { threshold } => {
                if value > 2.0 * threshold {
                    (Severity::High, Evidence::named("threshold", *threshold))
                } else if value > *threshold {
                    (Severity::Medium, Evidence::named("threshold", *threshold))
                } else {
                    return Vec::new();
                }
            }
            OutlierMode::Disabled => return Vec::new(),
        };

        let rank = snapshot.rank(self.metric, value);
        vec![Finding::new(self.kind, severity, profile.path())
            .with_evidence(Evidence::metric(self.metric, value, Some(rank)))
            .with_evidence(bound)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThresholdsConfig;
    use crate::core::FileSignals;

    fn snapshot_with_complexity(values: &[u32]) -> CodebaseSnapshot {
        let files = values
            .iter()
            .enumerate()
            .map(|(i, &c)| FileSignals {
                cyclomatic_complexity: c,
                ..FileSignals::new(format!("f{i:03}.rs"))
            })
            .collect();
        CodebaseSnapshot::from_signals(files, &ThresholdsConfig::default()).unwrap()
    }

    fn detector(snapshot: &CodebaseSnapshot) -> OutlierDetector {
        OutlierDetector::prepare(
            snapshot,
            Metric::CyclomaticComplexity,
            FindingKind::ComplexityOutlier,
            true,
        )
    }

    #[test]
    fn test_small_codebase_uses_absolute_threshold() {
        let snapshot = snapshot_with_complexity(&[1, 5, 16, 40]);
        let d = detector(&snapshot);
        assert_eq!(d.mode(), &OutlierMode::Absolute { threshold: 15.0 });
        assert!(d.detect(&snapshot, 1).is_empty());
        assert_eq!(d.detect(&snapshot, 2)[0].severity, Severity::Medium);
        assert_eq!(d.detect(&snapshot, 3)[0].severity, Severity::High);
    }

    #[test]
    fn test_fences_flag_high_side_only() {
        // 60 files spread over 1..=30, plus one moderate and one extreme value
        let mut values: Vec<u32> = (0..60).map(|i| 1 + i / 2).collect();
        values.push(70);
        values.push(200);
        let snapshot = snapshot_with_complexity(&values);
        let d = detector(&snapshot);
        assert!(matches!(d.mode(), OutlierMode::Fences { .. }));

        let findings: Vec<Finding> = (0..snapshot.len())
            .flat_map(|i| d.detect(&snapshot, i))
            .collect();
        assert_eq!(findings.len(), 2);
        let high: Vec<_> = findings
            .iter()
            .filter(|f| f.severity == Severity::High)
            .collect();
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].evidence[0].value, 200.0);
    }

    #[test]
    fn test_zero_spread_falls_back_to_threshold() {
        let mut values = vec![3u32; 60];
        values.push(100);
        let snapshot = snapshot_with_complexity(&values);
        let d = detector(&snapshot);
        assert_eq!(d.mode(), &OutlierMode::Absolute { threshold: 15.0 });
        let flagged: Vec<Finding> = (0..snapshot.len())
            .flat_map(|i| d.detect(&snapshot, i))
            .collect();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].severity, Severity::High);
    }
}
