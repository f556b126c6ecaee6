//! Pairwise auxiliary data and pair assessment.
//!
//! Graph distances, structural edges, co-change support and module
//! membership are computed upstream. The engine only reads them through
//! [`CouplingOracle`]; [`PairTables`] is the table-backed implementation
//! used for signal bundles.

use super::congruence::{classify_congruence, Congruence};
use super::coupling::{is_hidden_coupling, share_module};
use crate::config::DetectorsConfig;
use crate::core::{Evidence, Finding, FindingKind, Severity};
use crate::effects::{validation_from_errors, Validated};
use crate::errors::DataError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Read access to externally computed pair data.
///
/// Lookups are symmetric: `(a, b)` and `(b, a)` answer the same.
pub trait CouplingOracle: Sync {
    /// Pairs worth assessing, each listed once.
    fn candidate_pairs(&self) -> Vec<(PathBuf, PathBuf)>;

    /// Commits touching both files over commits touching either, in [0, 1].
    fn cochange_support(&self, a: &Path, b: &Path) -> f64;

    fn has_structural_edge(&self, a: &Path, b: &Path) -> bool;

    fn module_of(&self, file: &Path) -> Option<&str>;

    /// Shortest path in the dependency graph; `None` when unreachable.
    fn technical_distance(&self, a: &Path, b: &Path) -> Option<f64>;

    /// Shortest path in the co-change or co-authorship graph.
    fn coordination_distance(&self, a: &Path, b: &Path) -> Option<f64>;
}

/// One row of pair data as supplied on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRecord {
    pub a: PathBuf,
    pub b: PathBuf,
    #[serde(default)]
    pub cochange_support: f64,
    #[serde(default)]
    pub structural_edge: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordination_distance: Option<f64>,
}

impl PairRecord {
    pub fn new(a: impl Into<PathBuf>, b: impl Into<PathBuf>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            cochange_support: 0.0,
            structural_edge: false,
            technical_distance: None,
            coordination_distance: None,
        }
    }

    fn label(&self) -> String {
        format!("{} <-> {}", self.a.display(), self.b.display())
    }

    fn errors(&self) -> Vec<DataError> {
        let label = self.label();
        let mut errors = Vec::new();
        let support = self.cochange_support;
        if !support.is_finite() {
            errors.push(DataError::not_finite(&label, "cochange_support", support));
        } else if !(0.0..=1.0).contains(&support) {
            errors.push(DataError::out_of_range(
                &label,
                "cochange_support",
                support,
                0.0,
                1.0,
            ));
        }
        for (field, distance) in [
            ("technical_distance", self.technical_distance),
            ("coordination_distance", self.coordination_distance),
        ] {
            match distance {
                Some(d) if d.is_nan() => errors.push(DataError::not_finite(&label, field, d)),
                Some(d) if d < 0.0 => {
                    errors.push(DataError::out_of_range(&label, field, d, 0.0, f64::INFINITY))
                }
                _ => {}
            }
        }
        if self.a == self.b {
            errors.push(DataError::self_pair(&label));
        }
        errors
    }
}

fn key(a: &Path, b: &Path) -> (PathBuf, PathBuf) {
    if a <= b {
        (a.to_path_buf(), b.to_path_buf())
    } else {
        (b.to_path_buf(), a.to_path_buf())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct PairTablesWire {
    #[serde(default)]
    modules: BTreeMap<PathBuf, String>,
    #[serde(default)]
    pairs: Vec<PairRecord>,
}

/// Module assignments plus per-pair rows, indexed by unordered pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "PairTablesWire", into = "PairTablesWire")]
pub struct PairTables {
    modules: BTreeMap<PathBuf, String>,
    pairs: Vec<PairRecord>,
    index: HashMap<(PathBuf, PathBuf), usize>,
}

impl From<PairTablesWire> for PairTables {
    fn from(wire: PairTablesWire) -> Self {
        Self::new(wire.modules, wire.pairs)
    }
}

impl From<PairTables> for PairTablesWire {
    fn from(tables: PairTables) -> Self {
        Self {
            modules: tables.modules,
            pairs: tables.pairs,
        }
    }
}

impl PairTables {
    /// Later rows for the same unordered pair replace earlier ones.
    pub fn new(modules: BTreeMap<PathBuf, String>, pairs: Vec<PairRecord>) -> Self {
        let index = pairs
            .iter()
            .enumerate()
            .map(|(i, p)| (key(&p.a, &p.b), i))
            .collect();
        Self {
            modules,
            pairs,
            index,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn records(&self) -> &[PairRecord] {
        &self.pairs
    }

    /// Every malformed row, reported at once.
    pub fn validate(self) -> Validated<Self, DataError> {
        let errors: Vec<DataError> = self.pairs.iter().flat_map(PairRecord::errors).collect();
        validation_from_errors(self, errors)
    }

    fn record(&self, a: &Path, b: &Path) -> Option<&PairRecord> {
        self.index.get(&key(a, b)).map(|&i| &self.pairs[i])
    }
}

impl CouplingOracle for PairTables {
    fn candidate_pairs(&self) -> Vec<(PathBuf, PathBuf)> {
        let mut keys: Vec<(PathBuf, PathBuf)> = self.index.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn cochange_support(&self, a: &Path, b: &Path) -> f64 {
        self.record(a, b).map_or(0.0, |r| r.cochange_support)
    }

    fn has_structural_edge(&self, a: &Path, b: &Path) -> bool {
        self.record(a, b).is_some_and(|r| r.structural_edge)
    }

    fn module_of(&self, file: &Path) -> Option<&str> {
        self.modules.get(file).map(String::as_str)
    }

    fn technical_distance(&self, a: &Path, b: &Path) -> Option<f64> {
        self.record(a, b).and_then(|r| r.technical_distance)
    }

    fn coordination_distance(&self, a: &Path, b: &Path) -> Option<f64> {
        self.record(a, b).and_then(|r| r.coordination_distance)
    }
}

/// Verdicts for one pair of files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairAssessment {
    pub a: PathBuf,
    pub b: PathBuf,
    pub cochange_support: f64,
    pub structural_edge: bool,
    pub same_module: bool,
    pub hidden_coupling: bool,
    pub congruence: Congruence,
}

pub fn assess_pair<O: CouplingOracle + ?Sized>(
    oracle: &O,
    a: &Path,
    b: &Path,
    config: &DetectorsConfig,
) -> PairAssessment {
    let cochange_support = oracle.cochange_support(a, b);
    let structural_edge = oracle.has_structural_edge(a, b);
    let same_module = share_module(oracle.module_of(a), oracle.module_of(b));
    PairAssessment {
        a: a.to_path_buf(),
        b: b.to_path_buf(),
        cochange_support,
        structural_edge,
        same_module,
        hidden_coupling: is_hidden_coupling(
            cochange_support,
            structural_edge,
            same_module,
            config.hidden_coupling_support,
        ),
        congruence: classify_congruence(
            oracle.technical_distance(a, b),
            oracle.coordination_distance(a, b),
            config.far_distance,
            config.near_distance,
        ),
    }
}

impl PairAssessment {
    /// Pair findings; each names both files and is attached to both.
    pub fn findings(&self, config: &DetectorsConfig) -> Vec<Finding> {
        let mut findings = Vec::new();
        if self.hidden_coupling {
            let severity = if self.cochange_support > 2.0 * config.hidden_coupling_support {
                Severity::High
            } else {
                Severity::Medium
            };
            findings.push(
                Finding::pair(FindingKind::HiddenCoupling, severity, &self.a, &self.b)
                    .with_evidence(Evidence::named("cochange_support", self.cochange_support)),
            );
        }
        let congruence_kind = match self.congruence {
            Congruence::CoordinationOverhead => Some(FindingKind::CoordinationOverhead),
            Congruence::MissingCoordination => Some(FindingKind::MissingCoordination),
            Congruence::Aligned => None,
        };
        if let Some(kind) = congruence_kind {
            findings.push(Finding::pair(kind, Severity::Medium, &self.a, &self.b));
        }
        findings
    }

    pub fn is_flagged(&self) -> bool {
        self.hidden_coupling || self.congruence != Congruence::Aligned
    }
}
