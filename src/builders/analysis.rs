//! Two-phase scoring run.
//!
//! Phase 1 is global and sequential: validate every signal record and pair
//! row, then build the [`CodebaseSnapshot`] (distributions, medians,
//! strategy). Phase 2 is per file and runs on rayon: pair checks first,
//! since their findings count towards both files, then detectors and
//! composite scoring. Prioritization and pattern roll-up close the run.
//!
//! A run either completes or returns an error. Invalid input and
//! cancellation both discard everything computed so far.

use crate::config::{validate_config_result, RiskmapConfig};
use crate::core::{CodebaseSnapshot, FileSignalsInput, Finding, PatternFinding, SnapshotSummary};
use crate::detectors::DetectorSet;
use crate::effects::run_validation;
use crate::errors::{Error, Result};
use crate::io::SignalBundle;
use crate::mismatch::{assess_pair, CouplingOracle, PairAssessment};
use crate::observability::{
    get_current_context, get_progress, increment_processed, set_current_file, set_phase,
    set_progress, AnalysisPhase,
};
use crate::priority::{
    rank_scores, ArchitectureSignals, FocusSelector, FocusVerdict, PatternAggregator,
    PatternInput,
};
use crate::risk::{ActionabilityScore, CompositeScorer};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, debug_span, info, info_span, trace, warn};

/// Everything a run produces.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub summary: SnapshotSummary,
    pub focus: FocusVerdict,
    /// Every file, in ranking order
    pub ranked: Vec<ActionabilityScore>,
    /// Pairs with at least one flag, in pair order
    pub flagged_pairs: Vec<PairAssessment>,
    pub patterns: Vec<PatternFinding>,
}

/// One configured scoring run.
pub struct AnalysisRun {
    config: RiskmapConfig,
    jobs: Option<usize>,
    cancel: Arc<AtomicBool>,
}

impl AnalysisRun {
    pub fn new(config: RiskmapConfig) -> Self {
        Self {
            config,
            jobs: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run phase 2 on a dedicated pool of `jobs` threads.
    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs.filter(|&n| n > 0);
        self
    }

    pub fn config(&self) -> &RiskmapConfig {
        &self.config
    }

    /// Setting the flag makes the run stop at the next file and return
    /// [`Error::Cancelled`].
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Score a signal bundle. Malformed file records and malformed pair rows
    /// are reported together.
    pub fn run(&self, bundle: SignalBundle) -> Result<AnalysisReport> {
        validate_config_result(&self.config)?;
        let SignalBundle {
            files,
            pairs,
            architecture,
        } = bundle;

        let (snapshot, pairs) = {
            let _phase = set_phase(AnalysisPhase::SignalValidation);
            let pairs = run_validation(pairs.validate(), Error::InvalidSignals);
            let snapshot = self.build_snapshot(files);
            match (snapshot, pairs) {
                (Ok(snapshot), Ok(pairs)) => (snapshot, pairs),
                (snapshot, pairs) => return Err(merge_failures(snapshot.err(), pairs.err())),
            }
        };

        self.score(&snapshot, &pairs, &architecture)
    }

    /// Score file records against any source of pair data.
    pub fn run_with_oracle<O: CouplingOracle>(
        &self,
        files: Vec<FileSignalsInput>,
        oracle: &O,
        architecture: &ArchitectureSignals,
    ) -> Result<AnalysisReport> {
        validate_config_result(&self.config)?;
        let snapshot = {
            let _phase = set_phase(AnalysisPhase::SignalValidation);
            self.build_snapshot(files)?
        };
        self.score(&snapshot, oracle, architecture)
    }

    fn build_snapshot(&self, files: Vec<FileSignalsInput>) -> Result<CodebaseSnapshot> {
        let _span = debug_span!("aggregation", records = files.len()).entered();
        let _phase = set_phase(AnalysisPhase::Aggregation);
        CodebaseSnapshot::build(files, &self.config.thresholds)
    }

    fn score<O: CouplingOracle + ?Sized>(
        &self,
        snapshot: &CodebaseSnapshot,
        oracle: &O,
        architecture: &ArchitectureSignals,
    ) -> Result<AnalysisReport> {
        let span = info_span!(
            "risk_analysis",
            file_count = snapshot.len(),
            strategy = %snapshot.strategy(),
        );
        let _guard = span.enter();
        info!(
            file_count = snapshot.len(),
            strategy = %snapshot.strategy(),
            "Starting risk analysis"
        );

        match self.jobs {
            Some(jobs) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .build()
                    .map_err(|e| Error::config(format!("cannot start {jobs} worker threads: {e}")))?;
                pool.install(|| self.score_in_pool(snapshot, oracle, architecture))
            }
            None => self.score_in_pool(snapshot, oracle, architecture),
        }
    }

    fn score_in_pool<O: CouplingOracle + ?Sized>(
        &self,
        snapshot: &CodebaseSnapshot,
        oracle: &O,
        architecture: &ArchitectureSignals,
    ) -> Result<AnalysisReport> {
        let assessments = self.assess_pairs(snapshot, oracle)?;
        let scores = self.score_files(snapshot, &assessments)?;

        let (focus, ranked) = {
            let _span = debug_span!("prioritization").entered();
            let _phase = set_phase(AnalysisPhase::Prioritization);
            self.check_cancelled(AnalysisPhase::Prioritization)?;
            let focus = FocusSelector::new(self.config.focus.alternatives).select(&scores);
            let mut ranked = scores;
            rank_scores(&mut ranked);
            (focus, ranked)
        };

        let patterns = {
            let _span = debug_span!("pattern_aggregation").entered();
            let _phase = set_phase(AnalysisPhase::PatternAggregation);
            self.check_cancelled(AnalysisPhase::PatternAggregation)?;
            PatternAggregator::new(&self.config.patterns).aggregate(PatternInput {
                snapshot,
                architecture,
                scores: &ranked,
                pairs: &assessments,
            })
        };

        info!(
            focus = ?focus.focus().map(|f| f.path.display().to_string()),
            patterns = patterns.len(),
            "Risk analysis complete"
        );

        Ok(AnalysisReport {
            summary: snapshot.summary(),
            focus,
            ranked,
            flagged_pairs: assessments.into_iter().filter(|p| p.is_flagged()).collect(),
            patterns,
        })
    }

    /// Pairs naming a file outside the snapshot are skipped.
    fn assess_pairs<O: CouplingOracle + ?Sized>(
        &self,
        snapshot: &CodebaseSnapshot,
        oracle: &O,
    ) -> Result<Vec<PairAssessment>> {
        let _span = debug_span!("pair_analysis").entered();
        let _phase = set_phase(AnalysisPhase::PairAnalysis);
        let detectors = &self.config.detectors;

        let assessed: Vec<Option<PairAssessment>> = oracle
            .candidate_pairs()
            .into_par_iter()
            .map(|(a, b)| {
                self.check_cancelled(AnalysisPhase::PairAnalysis)?;
                let _phase = set_phase(AnalysisPhase::PairAnalysis);
                if snapshot.index_of(&a).is_none() || snapshot.index_of(&b).is_none() {
                    warn!(
                        a = %a.display(),
                        b = %b.display(),
                        context = %get_current_context(),
                        "Skipping pair with a file outside the snapshot"
                    );
                    return Ok(None);
                }
                Ok(Some(assess_pair(oracle, &a, &b, detectors)))
            })
            .collect::<Result<_>>()?;

        let assessments: Vec<PairAssessment> = assessed.into_iter().flatten().collect();
        debug!(
            pairs = assessments.len(),
            flagged = assessments.iter().filter(|p| p.is_flagged()).count(),
            "Pair analysis complete"
        );
        Ok(assessments)
    }

    fn score_files(
        &self,
        snapshot: &CodebaseSnapshot,
        assessments: &[PairAssessment],
    ) -> Result<Vec<ActionabilityScore>> {
        let _span = debug_span!("file_scoring", files = snapshot.len()).entered();
        let _phase = set_phase(AnalysisPhase::FileScoring);

        let pair_findings = pair_findings_by_file(snapshot, assessments, &self.config);
        let detectors = DetectorSet::standard(snapshot, &self.config);
        let scorer = CompositeScorer::new(snapshot, &self.config.scoring);
        set_progress(0, snapshot.len());

        let scores: Vec<ActionabilityScore> = snapshot
            .files()
            .par_iter()
            .enumerate()
            .map(|(idx, profile)| {
                self.check_cancelled(AnalysisPhase::FileScoring)?;
                let _phase = set_phase(AnalysisPhase::FileScoring);
                let _file = set_current_file(profile.path());
                trace!(context = %get_current_context(), "Scoring file");
                let mut findings = detectors.detect(snapshot, idx);
                if let Some(shared) = pair_findings.get(&idx) {
                    findings.extend(shared.iter().cloned());
                }
                let score = scorer.actionability(profile, findings);
                increment_processed();
                Ok(score)
            })
            .collect::<Result<_>>()?;

        let (processed, total) = get_progress();
        debug!(
            files = scores.len(),
            processed,
            total,
            actionable = scores.iter().filter(|s| s.value() > 0.0).count(),
            "File scoring complete"
        );
        Ok(scores)
    }

    fn check_cancelled(&self, phase: AnalysisPhase) -> Result<()> {
        if self.cancel.load(Ordering::Relaxed) {
            Err(Error::Cancelled { phase })
        } else {
            Ok(())
        }
    }
}

/// Each pair finding is attached to both of its files.
fn pair_findings_by_file(
    snapshot: &CodebaseSnapshot,
    assessments: &[PairAssessment],
    config: &RiskmapConfig,
) -> HashMap<usize, Vec<Finding>> {
    let mut by_file: HashMap<usize, Vec<Finding>> = HashMap::new();
    for assessment in assessments {
        let findings = assessment.findings(&config.detectors);
        if findings.is_empty() {
            continue;
        }
        for path in [&assessment.a, &assessment.b] {
            if let Some(idx) = snapshot.index_of(path) {
                by_file
                    .entry(idx)
                    .or_default()
                    .extend(findings.iter().cloned());
            }
        }
    }
    by_file
}

/// Fold the data errors of both validation steps into one report.
fn merge_failures(snapshot: Option<Error>, pairs: Option<Error>) -> Error {
    let mut data_errors = Vec::new();
    for error in [snapshot, pairs].into_iter().flatten() {
        match error {
            Error::InvalidSignals(errors) => data_errors.extend(errors),
            other => return other,
        }
    }
    Error::InvalidSignals(data_errors)
}
