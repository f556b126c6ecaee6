use super::FileDetector;
use crate::core::{CodebaseSnapshot, Evidence, Finding, FindingKind, Metric, Severity};
use crate::stats::Trajectory;

/// Hotspot whose monthly changes are erratic (churning) or erratic and
/// rising (spiking).
pub struct UnstableFileDetector;

impl FileDetector for UnstableFileDetector {
    fn detector_name(&self) -> &'static str {
        "unstable_file"
    }

    fn detect(&self, snapshot: &CodebaseSnapshot, idx: usize) -> Vec<Finding> {
        let Some(profile) = snapshot.file(idx) else {
            return Vec::new();
        };
        let churn = &profile.churn;
        if !snapshot.is_hotspot(profile) || !churn.trajectory.is_unstable() {
            return Vec::new();
        }

        let severity = match churn.trajectory {
            Trajectory::Spiking => Severity::High,
            _ => Severity::Medium,
        };
        vec![Finding::new(FindingKind::UnstableFile, severity, profile.path())
            .with_evidence(Evidence::metric(
                Metric::TotalChanges,
                f64::from(profile.signals.total_changes),
                Some(snapshot.rank_of(Metric::TotalChanges, profile)),
            ))
            .with_evidence(Evidence::named("churn_slope", churn.slope))
            .with_evidence(Evidence::named("churn_cv", churn.cv))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThresholdsConfig;
    use crate::core::FileSignals;

    fn with_churn(path: &str, series: Vec<u32>) -> FileSignals {
        let total = series.iter().sum();
        let mut signals = FileSignals {
            total_changes: total,
            monthly_churn: series,
            ..FileSignals::new(path)
        };
        if total > 0 {
            signals.author_line_shares.insert("ana".to_string(), 1.0);
        }
        signals
    }

    #[test]
    fn test_spiking_hotspot_is_flagged_high() {
        let snapshot = CodebaseSnapshot::from_signals(
            vec![
                with_churn("hot.rs", vec![0, 0, 1, 0, 9]),
                with_churn("calm.rs", vec![1, 1, 1, 1, 1]),
                with_churn("cold.rs", vec![0, 0, 0, 0, 0]),
            ],
            &ThresholdsConfig::default(),
        )
        .unwrap();
        let hot = snapshot.index_of(std::path::Path::new("hot.rs")).unwrap();
        let findings = UnstableFileDetector.detect(&snapshot, hot);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::High);

        let calm = snapshot.index_of(std::path::Path::new("calm.rs")).unwrap();
        assert!(UnstableFileDetector.detect(&snapshot, calm).is_empty());
    }

    #[test]
    fn test_erratic_non_hotspot_is_ignored() {
        let snapshot = CodebaseSnapshot::from_signals(
            vec![
                with_churn("a.rs", vec![4, 0, 4, 0]),
                with_churn("b.rs", vec![9, 9, 9, 9]),
                with_churn("c.rs", vec![9, 9, 9, 9]),
            ],
            &ThresholdsConfig::default(),
        )
        .unwrap();
        let a = snapshot.index_of(std::path::Path::new("a.rs")).unwrap();
        assert!(UnstableFileDetector.detect(&snapshot, a).is_empty());
    }
}
