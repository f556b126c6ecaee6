//! The immutable per-run view every detector reads.
//!
//! A [`CodebaseSnapshot`] is built once, in a single pass over validated
//! signals, and never changes afterwards. It owns:
//!
//! - the validated [`FileSignals`], ordered by path, with derived ownership
//!   and churn trajectory per file,
//! - one sorted [`Distribution`] per [`Metric`],
//! - the median of `total_changes` (the hotspot cut-off),
//! - the [`ThresholdStrategy`] and its prior weight,
//! - per-window change scatter.
//!
//! Construction validates every record and reports every data error before
//! failing; nothing is ever partially built.

use crate::config::ThresholdsConfig;
use crate::core::metrics::Metric;
use crate::core::signals::{FileSignals, FileSignalsInput};
use crate::effects::{combine_validations, run_validation};
use crate::errors::{DataError, Error, Result};
use crate::stats::{
    ChangeScatter, ChurnProfile, Distribution, MetricScale, Ownership, RiskLevel,
    ThresholdStrategy,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One file's signals plus everything derived from them alone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileProfile {
    pub signals: FileSignals,
    pub ownership: Ownership,
    pub churn: ChurnProfile,
}

impl FileProfile {
    pub fn path(&self) -> &Path {
        &self.signals.path
    }

    pub fn raw(&self, metric: Metric) -> f64 {
        metric.raw_value(&self.signals, self.ownership.bus_factor)
    }
}

/// Change scatter of one monthly window, oldest window first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowScatter {
    /// 0 is the oldest window across all series
    pub window: usize,
    pub files_changed: usize,
    pub scatter: ChangeScatter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotSummary {
    pub file_count: usize,
    pub strategy: ThresholdStrategy,
    pub prior_weight: f64,
    pub median_total_changes: f64,
    pub hotspot_count: usize,
    pub author_count: usize,
}

#[derive(Debug, Clone)]
pub struct CodebaseSnapshot {
    files: Vec<FileProfile>,
    index: im::OrdMap<PathBuf, usize>,
    distributions: BTreeMap<Metric, Distribution>,
    thresholds: ThresholdsConfig,
    strategy: ThresholdStrategy,
    prior_weight: f64,
    median_total_changes: f64,
    windows: Vec<WindowScatter>,
    author_count: usize,
}

impl CodebaseSnapshot {
    /// Validate wire records and build the snapshot.
    pub fn build(inputs: Vec<FileSignalsInput>, thresholds: &ThresholdsConfig) -> Result<Self> {
        let duplicates = find_duplicates(inputs.iter().filter_map(|i| i.path.as_deref()));
        let validations = inputs
            .into_iter()
            .enumerate()
            .map(|(index, input)| input.validate(index))
            .collect();
        let signals = match run_validation(combine_validations(validations), |errors| errors) {
            Ok(signals) if duplicates.is_empty() => signals,
            Ok(_) => return Err(Error::InvalidSignals(duplicates)),
            Err(mut errors) => {
                errors.extend(duplicates);
                return Err(Error::InvalidSignals(errors));
            }
        };
        Ok(Self::assemble(signals, thresholds))
    }

    /// Build from already typed signals. They go through the same checks as
    /// wire records, so ranges and share sums still hold.
    pub fn from_signals(signals: Vec<FileSignals>, thresholds: &ThresholdsConfig) -> Result<Self> {
        Self::build(
            signals.into_iter().map(FileSignalsInput::from).collect(),
            thresholds,
        )
    }

    fn assemble(mut signals: Vec<FileSignals>, thresholds: &ThresholdsConfig) -> Self {
        signals.sort_by(|a, b| a.path.cmp(&b.path));

        let trajectory = thresholds.trajectory_thresholds();
        let files: Vec<FileProfile> = signals
            .into_iter()
            .map(|signals| FileProfile {
                ownership: Ownership::from_shares(signals.author_line_shares.values().copied()),
                churn: ChurnProfile::from_series(&signals.monthly_churn, trajectory),
                signals,
            })
            .collect();

        let index = files
            .iter()
            .enumerate()
            .map(|(i, f)| (f.signals.path.clone(), i))
            .collect();

        let distributions: BTreeMap<Metric, Distribution> = Metric::ALL
            .into_iter()
            .map(|metric| {
                let values = files.iter().map(|f| f.raw(metric));
                (metric, Distribution::new(values))
            })
            .collect();

        let median_total_changes = distributions
            .get(&Metric::TotalChanges)
            .and_then(Distribution::median)
            .unwrap_or(0.0);

        let boundaries = thresholds.boundaries();
        let strategy = ThresholdStrategy::select_with(files.len(), boundaries);
        let prior_weight = match strategy {
            ThresholdStrategy::Absolute => 1.0,
            ThresholdStrategy::Bayesian => boundaries.prior_weight(files.len()),
            ThresholdStrategy::Full => 0.0,
        };

        let windows = window_scatter(&files);
        let author_count = files
            .iter()
            .flat_map(|f| f.signals.author_line_shares.keys())
            .collect::<BTreeSet<_>>()
            .len();

        debug!(
            file_count = files.len(),
            %strategy,
            prior_weight,
            median_total_changes,
            windows = windows.len(),
            author_count,
            "Built codebase snapshot"
        );

        Self {
            files,
            index,
            distributions,
            thresholds: thresholds.clone(),
            strategy,
            prior_weight,
            median_total_changes,
            windows,
            author_count,
        }
    }

    pub fn files(&self) -> &[FileProfile] {
        &self.files
    }

    pub fn file(&self, idx: usize) -> Option<&FileProfile> {
        self.files.get(idx)
    }

    pub fn index_of(&self, path: &Path) -> Option<usize> {
        self.index.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn strategy(&self) -> ThresholdStrategy {
        self.strategy
    }

    pub fn prior_weight(&self) -> f64 {
        self.prior_weight
    }

    pub fn thresholds(&self) -> &ThresholdsConfig {
        &self.thresholds
    }

    pub fn median_total_changes(&self) -> f64 {
        self.median_total_changes
    }

    pub fn author_count(&self) -> usize {
        self.author_count
    }

    pub fn windows(&self) -> &[WindowScatter] {
        &self.windows
    }

    /// Most recent window in which anything changed.
    pub fn latest_active_window(&self) -> Option<&WindowScatter> {
        self.windows.iter().rev().find(|w| w.files_changed > 0)
    }

    pub fn distribution(&self, metric: Metric) -> &Distribution {
        static EMPTY: Distribution = Distribution::empty();
        self.distributions.get(&metric).unwrap_or(&EMPTY)
    }

    /// Strategy inputs for `metric` under this run's configuration.
    pub fn scale(&self, metric: Metric) -> MetricScale<'_> {
        MetricScale {
            distribution: self.distribution(metric),
            polarity: metric.polarity(),
            threshold: self.thresholds.absolute.for_metric(metric),
            floor: self.thresholds.floors.for_metric(metric),
            prior_weight: self.prior_weight,
        }
    }

    /// Effective rank of a raw value, through the strategy table.
    pub fn rank(&self, metric: Metric, value: f64) -> f64 {
        self.strategy.rank(value, &self.scale(metric))
    }

    pub fn rank_of(&self, metric: Metric, profile: &FileProfile) -> f64 {
        self.rank(metric, profile.raw(metric))
    }

    pub fn classify(&self, metric: Metric, value: f64) -> RiskLevel {
        self.strategy.classify(value, &self.scale(metric))
    }

    pub fn exceeds(&self, metric: Metric, value: f64, rank_cut: f64) -> bool {
        self.strategy.exceeds(value, &self.scale(metric), rank_cut)
    }

    /// Changes above the snapshot median.
    pub fn is_hotspot(&self, profile: &FileProfile) -> bool {
        f64::from(profile.signals.total_changes) > self.median_total_changes
    }

    pub fn hotspot_count(&self) -> usize {
        self.files.iter().filter(|f| self.is_hotspot(f)).count()
    }

    pub fn summary(&self) -> SnapshotSummary {
        SnapshotSummary {
            file_count: self.files.len(),
            strategy: self.strategy,
            prior_weight: self.prior_weight,
            median_total_changes: self.median_total_changes,
            hotspot_count: self.hotspot_count(),
            author_count: self.author_count,
        }
    }
}

/// One error per path that appears more than once.
fn find_duplicates<'a>(paths: impl Iterator<Item = &'a str>) -> Vec<DataError> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    paths
        .filter(|p| !seen.insert(Path::new(*p)) && reported.insert(Path::new(*p)))
        .map(DataError::duplicate)
        .collect()
}

/// Series are aligned on their most recent month.
fn window_scatter(files: &[FileProfile]) -> Vec<WindowScatter> {
    let window_count = files
        .iter()
        .map(|f| f.signals.monthly_churn.len())
        .max()
        .unwrap_or(0);

    (0..window_count)
        .map(|window| {
            let back = window_count - window;
            let counts: Vec<f64> = files
                .iter()
                .filter_map(|f| {
                    let series = &f.signals.monthly_churn;
                    series
                        .len()
                        .checked_sub(back)
                        .map(|i| f64::from(series[i]))
                })
                .filter(|c| *c > 0.0)
                .collect();
            WindowScatter {
                window,
                files_changed: counts.len(),
                scatter: ChangeScatter::from_counts(&counts, files.len()),
            }
        })
        .collect()
}
