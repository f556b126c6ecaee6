use super::FileDetector;
use crate::core::{CodebaseSnapshot, Evidence, Finding, FindingKind, Metric, Severity};
use crate::stats::OwnershipBand;

/// A central, frequently changed file that effectively one person owns.
///
/// Not reported when the whole codebase has a single author: then every
/// file is a silo and none is worth singling out.
pub struct KnowledgeSiloDetector {
    pagerank_rank: f64,
}

impl KnowledgeSiloDetector {
    pub fn new(pagerank_rank: f64) -> Self {
        Self { pagerank_rank }
    }
}

impl FileDetector for KnowledgeSiloDetector {
    fn detector_name(&self) -> &'static str {
        "knowledge_silo"
    }

    fn detect(&self, snapshot: &CodebaseSnapshot, idx: usize) -> Vec<Finding> {
        let Some(profile) = snapshot.file(idx) else {
            return Vec::new();
        };
        let pagerank = profile.signals.pagerank;
        let is_silo = snapshot.author_count() > 1
            && snapshot.is_hotspot(profile)
            && profile.ownership.band == OwnershipBand::Critical
            && snapshot.exceeds(Metric::Pagerank, pagerank, self.pagerank_rank);
        if !is_silo {
            return Vec::new();
        }

        vec![Finding::new(FindingKind::KnowledgeSilo, Severity::High, profile.path())
            .with_evidence(Evidence::metric(
                Metric::BusFactor,
                profile.ownership.bus_factor,
                None,
            ))
            .with_evidence(Evidence::metric(
                Metric::Pagerank,
                pagerank,
                Some(snapshot.rank(Metric::Pagerank, pagerank)),
            ))
            .with_evidence(Evidence::metric(
                Metric::TotalChanges,
                f64::from(profile.signals.total_changes),
                Some(snapshot.rank_of(Metric::TotalChanges, profile)),
            ))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThresholdsConfig;
    use crate::core::FileSignals;
    use std::collections::BTreeMap;

    fn owned_by(path: &str, authors: &[(&str, f64)], pagerank: f64, changes: u32) -> FileSignals {
        FileSignals {
            pagerank,
            total_changes: changes,
            author_line_shares: authors
                .iter()
                .map(|(a, s)| (a.to_string(), *s))
                .collect::<BTreeMap<_, _>>(),
            ..FileSignals::new(path)
        }
    }

    #[test]
    fn test_central_single_owner_hotspot_is_silo() {
        let files = vec![
            owned_by("core.rs", &[("ana", 1.0)], 0.2, 40),
            owned_by("util.rs", &[("ana", 0.5), ("bo", 0.5)], 0.01, 2),
            owned_by("cli.rs", &[("bo", 1.0)], 0.01, 1),
        ];
        let snapshot = CodebaseSnapshot::from_signals(files, &ThresholdsConfig::default()).unwrap();
        let detector = KnowledgeSiloDetector::new(0.75);
        let idx = snapshot.index_of(std::path::Path::new("core.rs")).unwrap();
        let findings = detector.detect(&snapshot, idx);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::KnowledgeSilo);

        let cli = snapshot.index_of(std::path::Path::new("cli.rs")).unwrap();
        assert!(detector.detect(&snapshot, cli).is_empty());
    }

    #[test]
    fn test_single_author_codebase_has_no_silos() {
        let files = vec![
            owned_by("core.rs", &[("ana", 1.0)], 0.2, 40),
            owned_by("util.rs", &[("ana", 1.0)], 0.01, 2),
            owned_by("cli.rs", &[("ana", 1.0)], 0.01, 1),
        ];
        let snapshot = CodebaseSnapshot::from_signals(files, &ThresholdsConfig::default()).unwrap();
        let detector = KnowledgeSiloDetector::new(0.75);
        assert!((0..3).all(|i| detector.detect(&snapshot, i).is_empty()));
    }
}
