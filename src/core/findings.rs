//! Findings emitted by detectors and the pattern aggregator.

use crate::core::metrics::Metric;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingKind {
    ComplexityOutlier,
    SizeOutlier,
    KnowledgeSilo,
    UnstableFile,
    WrongAbstraction,
    HiddenCoupling,
    CoordinationOverhead,
    MissingCoordination,
}

impl FindingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ComplexityOutlier => "COMPLEXITY_OUTLIER",
            Self::SizeOutlier => "SIZE_OUTLIER",
            Self::KnowledgeSilo => "KNOWLEDGE_SILO",
            Self::UnstableFile => "UNSTABLE_FILE",
            Self::WrongAbstraction => "WRONG_ABSTRACTION",
            Self::HiddenCoupling => "HIDDEN_COUPLING",
            Self::CoordinationOverhead => "COORDINATION_OVERHEAD",
            Self::MissingCoordination => "MISSING_COORDINATION",
        }
    }

    /// Whether the finding is about a pair of files.
    pub fn is_pairwise(self) -> bool {
        matches!(
            self,
            Self::HiddenCoupling | Self::CoordinationOverhead | Self::MissingCoordination
        )
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signal value backing a finding, with its rank when one applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub signal: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<f64>,
}

impl Evidence {
    pub fn metric(metric: Metric, value: f64, rank: Option<f64>) -> Self {
        Self {
            signal: metric.as_str().to_string(),
            value,
            rank,
        }
    }

    pub fn named(signal: impl Into<String>, value: f64) -> Self {
        Self {
            signal: signal.into(),
            value,
            rank: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    /// Primary file first; pair findings name both files
    pub files: Vec<PathBuf>,
    pub evidence: Vec<Evidence>,
}

impl Finding {
    pub fn new(kind: FindingKind, severity: Severity, file: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            severity,
            files: vec![file.into()],
            evidence: Vec::new(),
        }
    }

    pub fn pair(
        kind: FindingKind,
        severity: Severity,
        a: impl Into<PathBuf>,
        b: impl Into<PathBuf>,
    ) -> Self {
        Self {
            kind,
            severity,
            files: vec![a.into(), b.into()],
            evidence: Vec::new(),
        }
    }

    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence.push(evidence);
        self
    }

    pub fn involves(&self, path: &std::path::Path) -> bool {
        self.files.iter().any(|f| f == path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternKind {
    LowModularity,
    DependencyCycles,
    WidespreadWrongAbstraction,
    PervasiveCoordinationOverhead,
    PervasiveMissingCoordination,
    ScatteredChanges,
    KnowledgeConcentration,
}

/// A codebase-scope finding with no single owning file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternFinding {
    pub kind: PatternKind,
    pub severity: Severity,
    pub evidence: Vec<Evidence>,
    /// Files that contributed, if any; ordered by path
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<PathBuf>,
}
