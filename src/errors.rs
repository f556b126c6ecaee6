//! Error types for riskmap scoring runs.
//!
//! Two families matter to callers:
//!
//! - [`DataError`]: a signal record is unusable (missing field, value out of
//!   range, ownership shares that do not sum to one). These are fatal for the
//!   whole run. Snapshot construction collects every one of them before
//!   failing, so the caller sees all offending files at once.
//! - Everything else in [`Error`]: configuration, I/O, cancellation.
//!
//! Degenerate statistics (empty distributions, zero spread) and low-confidence
//! data never surface as errors; they are absorbed by the scoring code.

use crate::observability::AnalysisPhase;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// What is wrong with a single field of a signal record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataProblem {
    /// Required field absent from the record
    Missing,
    /// Numeric value outside its documented range
    OutOfRange { value: f64, min: f64, max: f64 },
    /// NaN or infinite
    NotFinite { value: f64 },
    /// `author_line_shares` must sum to approximately 1
    SharesDoNotSumToOne { sum: f64 },
    /// The same file identifier appears more than once in one run
    DuplicateFile,
    /// A pair row names the same file twice
    SelfPair,
}

impl fmt::Display for DataProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "is missing"),
            Self::OutOfRange { value, min, max } => {
                write!(f, "is out of range: {value} (expected {min}..={max})")
            }
            Self::NotFinite { value } => write!(f, "is not a finite number: {value}"),
            Self::SharesDoNotSumToOne { sum } => {
                write!(f, "shares sum to {sum:.4}, expected 1.0")
            }
            Self::DuplicateFile => write!(f, "identifies a file already present in this run"),
            Self::SelfPair => write!(f, "pairs a file with itself"),
        }
    }
}

/// A signal record that cannot be scored.
///
/// Always names the offending file and field so the rendering layer can
/// report something more useful than "invalid input".
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{file}: field `{field}` {problem}")]
pub struct DataError {
    pub file: String,
    pub field: &'static str,
    pub problem: DataProblem,
}

impl DataError {
    pub fn missing(file: impl Into<String>, field: &'static str) -> Self {
        Self {
            file: file.into(),
            field,
            problem: DataProblem::Missing,
        }
    }

    pub fn out_of_range(
        file: impl Into<String>,
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    ) -> Self {
        Self {
            file: file.into(),
            field,
            problem: DataProblem::OutOfRange { value, min, max },
        }
    }

    pub fn not_finite(file: impl Into<String>, field: &'static str, value: f64) -> Self {
        Self {
            file: file.into(),
            field,
            problem: DataProblem::NotFinite { value },
        }
    }

    pub fn shares_sum(file: impl Into<String>, sum: f64) -> Self {
        Self {
            file: file.into(),
            field: "author_line_shares",
            problem: DataProblem::SharesDoNotSumToOne { sum },
        }
    }

    pub fn duplicate(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            field: "path",
            problem: DataProblem::DuplicateFile,
        }
    }

    pub fn self_pair(pair: impl Into<String>) -> Self {
        Self {
            file: pair.into(),
            field: "b",
            problem: DataProblem::SelfPair,
        }
    }
}

/// Main error type for riskmap operations.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more signal records are unusable; the run was aborted.
    #[error("{}", summarize_data_errors(.0))]
    InvalidSignals(Vec<DataError>),

    /// Configuration values failed validation (all issues listed).
    #[error("invalid configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),

    /// Configuration could not be read or parsed.
    #[error("configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input or output document could not be (de)serialized.
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// The run was cancelled; every partial result was discarded.
    #[error("analysis cancelled during {phase}")]
    Cancelled { phase: AnalysisPhase },
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    pub fn config_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Data errors carried by this error, if any.
    #[must_use]
    pub fn data_errors(&self) -> &[DataError] {
        match self {
            Self::InvalidSignals(errors) => errors,
            _ => &[],
        }
    }

    /// Whether the caller can fix this by correcting input or config.
    #[must_use]
    pub fn is_user_fixable(&self) -> bool {
        matches!(
            self,
            Self::InvalidSignals(_) | Self::InvalidConfig(_) | Self::Config { .. } | Self::Parse { .. }
        )
    }
}

fn summarize_data_errors(errors: &[DataError]) -> String {
    match errors {
        [] => "invalid signal data".to_string(),
        [only] => format!("invalid signal data: {only}"),
        [first, rest @ ..] => format!(
            "invalid signal data: {first} (and {} more error{})",
            rest.len(),
            if rest.len() == 1 { "" } else { "s" }
        ),
    }
}
