mod common;

use common::{bundle, file};
use proptest::prelude::*;
use riskmap::builders::AnalysisRun;
use riskmap::config::RiskmapConfig;
use riskmap::core::FileSignals;
use riskmap::priority::FocusVerdict;
use riskmap::stats::{bus_factor, shannon_entropy, Distribution, Ownership};

fn codebase(rows: &[(u32, u32, f64, usize)]) -> Vec<FileSignals> {
    rows.iter()
        .enumerate()
        .map(|(i, &(changes, complexity, pagerank, blast))| {
            file(&format!("src/p{i:03}.rs"))
                .changes(changes)
                .complexity(complexity)
                .pagerank(pagerank)
                .blast_radius(blast)
                .build()
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_percentile_rank_is_monotone(
        values in prop::collection::vec(0.0f64..1000.0, 1..60),
        a in 0.0f64..1000.0,
        b in 0.0f64..1000.0,
    ) {
        let dist = Distribution::new(values);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let (r_lo, r_hi) = (dist.percentile_rank(lo), dist.percentile_rank(hi));
        prop_assert!(r_lo <= r_hi);
        prop_assert!((0.0..=1.0).contains(&r_lo));
        prop_assert!((0.0..=1.0).contains(&r_hi));
    }

    #[test]
    fn prop_maximum_ranks_at_one(values in prop::collection::vec(0.0f64..1000.0, 1..60)) {
        let max = values.iter().copied().fold(f64::MIN, f64::max);
        prop_assert_eq!(Distribution::new(values).percentile_rank(max), 1.0);
    }

    #[test]
    fn prop_entropy_is_bounded_by_category_count(
        weights in prop::collection::vec(0.01f64..10.0, 1..12),
    ) {
        let total: f64 = weights.iter().sum();
        let entropy = shannon_entropy(weights.iter().map(|w| w / total));
        prop_assert!(entropy >= 0.0);
        prop_assert!(entropy <= (weights.len() as f64).log2() + 1e-9);
        prop_assert!(bus_factor(entropy) >= 1.0);
        prop_assert!(bus_factor(entropy) <= weights.len() as f64 + 1e-9);
    }

    #[test]
    fn prop_ownership_health_is_a_fraction(
        weights in prop::collection::vec(0.01f64..10.0, 1..12),
    ) {
        let total: f64 = weights.iter().sum();
        let ownership = Ownership::from_shares(weights.iter().map(|w| w / total));
        prop_assert!((0.0..=1.0).contains(&ownership.health));
    }

    #[test]
    fn prop_every_run_score_is_bounded(
        rows in prop::collection::vec((0u32..60, 1u32..80, 0.0f64..0.5, 0usize..120), 1..40),
    ) {
        let report = AnalysisRun::new(RiskmapConfig::default())
            .run(bundle(codebase(&rows)))
            .expect("valid codebase");
        prop_assert_eq!(report.ranked.len(), rows.len());
        for score in &report.ranked {
            prop_assert!((0.0..=1.0).contains(&score.risk_score));
            prop_assert!((0.0..=1.0).contains(&score.hotspot_score));
            prop_assert!((0.0..=1.0).contains(&score.value()));
            if !score.is_hotspot() {
                prop_assert_eq!(score.risk_score, 0.0);
            }
        }
        if let Some(focus) = report.focus.focus() {
            prop_assert!(focus.value() > 0.0);
            prop_assert_eq!(&report.ranked[0].path, &focus.path);
        }
    }

    #[test]
    fn prop_no_changes_means_no_focus(
        rows in prop::collection::vec((1u32..80, 0.0f64..0.5, 0usize..120), 1..40),
    ) {
        let rows: Vec<_> = rows.into_iter().map(|(c, p, b)| (0, c, p, b)).collect();
        let report = AnalysisRun::new(RiskmapConfig::default())
            .run(bundle(codebase(&rows)))
            .expect("valid codebase");
        let is_positive = matches!(report.focus, FocusVerdict::NoCriticalHotspot { .. });
        prop_assert!(is_positive);
    }
}
