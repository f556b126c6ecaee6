// Shared fixtures for riskmap integration tests
#![allow(dead_code)]

use riskmap::builders::{AnalysisReport, AnalysisRun};
use riskmap::config::RiskmapConfig;
use riskmap::core::{FileSignals, FileSignalsInput};
use riskmap::io::SignalBundle;
use riskmap::mismatch::{PairRecord, PairTables};
use riskmap::priority::ArchitectureSignals;
use riskmap::risk::ActionabilityScore;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Fluent builder over `FileSignals` with quiet, healthy defaults.
#[derive(Debug, Clone)]
pub struct FileBuilder {
    signals: FileSignals,
}

pub fn file(path: &str) -> FileBuilder {
    let mut signals = FileSignals::new(path);
    signals.lines = 120;
    signals.cyclomatic_complexity = 4;
    signals.cognitive_complexity = 3;
    signals.efferent_coupling = 2;
    signals.afferent_coupling = 2;
    signals.test_coverage = 0.8;
    signals.pagerank = 0.01;
    signals.blast_radius_size = 3;
    FileBuilder { signals }
}

impl FileBuilder {
    /// Total changes spread evenly over a single author.
    pub fn changes(mut self, total: u32) -> Self {
        self.signals.total_changes = total;
        if total > 0 && self.signals.author_line_shares.is_empty() {
            self.signals
                .author_line_shares
                .insert("ana".to_string(), 1.0);
        }
        self
    }

    pub fn owners(mut self, shares: &[(&str, f64)]) -> Self {
        self.signals.author_line_shares = shares
            .iter()
            .map(|(name, share)| (name.to_string(), *share))
            .collect();
        self
    }

    pub fn churn(mut self, monthly: &[u32]) -> Self {
        self.signals.monthly_churn = monthly.to_vec();
        self
    }

    pub fn lines(mut self, lines: usize) -> Self {
        self.signals.lines = lines;
        self
    }

    pub fn complexity(mut self, cyclomatic: u32) -> Self {
        self.signals.cyclomatic_complexity = cyclomatic;
        self.signals.cognitive_complexity = cyclomatic;
        self
    }

    pub fn efferent(mut self, efferent: u32) -> Self {
        self.signals.efferent_coupling = efferent;
        self
    }

    pub fn coverage(mut self, coverage: f64) -> Self {
        self.signals.test_coverage = coverage;
        self
    }

    pub fn pagerank(mut self, pagerank: f64) -> Self {
        self.signals.pagerank = pagerank;
        self
    }

    pub fn blast_radius(mut self, size: usize) -> Self {
        self.signals.blast_radius_size = size;
        self
    }

    pub fn orphan(mut self) -> Self {
        self.signals.is_orphan = true;
        self
    }

    pub fn build(self) -> FileSignals {
        self.signals
    }
}

/// A deterministic, unremarkable codebase of `n` files under `src/`.
pub fn quiet_codebase(n: usize) -> Vec<FileSignals> {
    (0..n)
        .map(|i| {
            let k = i as u32;
            file(&format!("src/mod_{i:03}.rs"))
                .changes(1 + k % 6)
                .lines(80 + (i * 37) % 300)
                .complexity(2 + k % 7)
                .efferent(1 + k % 4)
                .pagerank(0.005 + (i % 9) as f64 * 0.001)
                .blast_radius(1 + i % 5)
                .owners(&[("ana", 0.4), ("bo", 0.3), ("cy", 0.3)])
                .build()
        })
        .collect()
}

pub fn bundle(files: Vec<FileSignals>) -> SignalBundle {
    SignalBundle {
        files: files.into_iter().map(FileSignalsInput::from).collect(),
        pairs: PairTables::default(),
        architecture: ArchitectureSignals::default(),
    }
}

pub fn bundle_with_pairs(
    files: Vec<FileSignals>,
    modules: &[(&str, &str)],
    pairs: Vec<PairRecord>,
) -> SignalBundle {
    let modules: BTreeMap<PathBuf, String> = modules
        .iter()
        .map(|(f, m)| (PathBuf::from(f), m.to_string()))
        .collect();
    SignalBundle {
        pairs: PairTables::new(modules, pairs),
        ..bundle(files)
    }
}

pub fn run(bundle: SignalBundle) -> AnalysisReport {
    AnalysisRun::new(RiskmapConfig::default())
        .run(bundle)
        .expect("analysis should succeed")
}

pub fn score_for<'a>(report: &'a AnalysisReport, path: &str) -> &'a ActionabilityScore {
    report
        .ranked
        .iter()
        .find(|s| s.path == PathBuf::from(path))
        .unwrap_or_else(|| panic!("no score for {path}"))
}

pub fn ranked_paths(report: &AnalysisReport) -> Vec<String> {
    report
        .ranked
        .iter()
        .map(|s| s.path.display().to_string())
        .collect()
}
