//! Per-file signal records.
//!
//! Upstream collaborators hand over [`FileSignalsInput`] records in which
//! every field is optional, so an absent field can be reported by name
//! instead of failing deserialization of the whole bundle. Validation turns
//! a record into an immutable [`FileSignals`] or into the complete list of
//! [`DataError`]s it carries.

use crate::effects::{validation_from_errors, Validated};
use crate::errors::DataError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Author shares may drift this far from 1 before a record is rejected.
pub const SHARE_SUM_TOLERANCE: f64 = 0.01;

/// A signal record as supplied on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSignalsInput {
    pub path: Option<String>,
    pub lines: Option<f64>,
    pub cyclomatic_complexity: Option<f64>,
    pub cognitive_complexity: Option<f64>,
    pub efferent_coupling: Option<f64>,
    pub afferent_coupling: Option<f64>,
    pub test_coverage: Option<f64>,
    pub pagerank: Option<f64>,
    pub blast_radius_size: Option<f64>,
    pub is_orphan: Option<bool>,
    pub total_changes: Option<f64>,
    pub monthly_churn: Option<Vec<f64>>,
    pub author_line_shares: Option<BTreeMap<String, f64>>,
}

/// Validated signals for one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSignals {
    pub path: PathBuf,
    pub lines: usize,
    pub cyclomatic_complexity: u32,
    pub cognitive_complexity: u32,
    pub efferent_coupling: u32,
    pub afferent_coupling: u32,
    /// Fraction of lines covered, in [0, 1]
    pub test_coverage: f64,
    /// Normalized centrality, in [0, 1]
    pub pagerank: f64,
    pub blast_radius_size: usize,
    pub is_orphan: bool,
    pub total_changes: u32,
    /// Change counts per month, oldest first
    pub monthly_churn: Vec<u32>,
    /// Author → fraction of lines; sums to 1 unless the file has no history
    pub author_line_shares: BTreeMap<String, f64>,
}

impl FileSignals {
    /// A file with no signals at all: no lines, no history, no authors.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lines: 0,
            cyclomatic_complexity: 0,
            cognitive_complexity: 0,
            efferent_coupling: 0,
            afferent_coupling: 0,
            test_coverage: 0.0,
            pagerank: 0.0,
            blast_radius_size: 0,
            is_orphan: false,
            total_changes: 0,
            monthly_churn: Vec::new(),
            author_line_shares: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn id(&self) -> String {
        self.path.display().to_string()
    }
}

impl From<FileSignals> for FileSignalsInput {
    fn from(signals: FileSignals) -> Self {
        Self {
            path: Some(signals.path.display().to_string()),
            lines: Some(signals.lines as f64),
            cyclomatic_complexity: Some(f64::from(signals.cyclomatic_complexity)),
            cognitive_complexity: Some(f64::from(signals.cognitive_complexity)),
            efferent_coupling: Some(f64::from(signals.efferent_coupling)),
            afferent_coupling: Some(f64::from(signals.afferent_coupling)),
            test_coverage: Some(signals.test_coverage),
            pagerank: Some(signals.pagerank),
            blast_radius_size: Some(signals.blast_radius_size as f64),
            is_orphan: Some(signals.is_orphan),
            total_changes: Some(f64::from(signals.total_changes)),
            monthly_churn: Some(signals.monthly_churn.into_iter().map(f64::from).collect()),
            author_line_shares: Some(signals.author_line_shares),
        }
    }
}

/// Collects field problems for one record.
struct RecordCheck {
    file: String,
    errors: Vec<DataError>,
}

impl RecordCheck {
    fn present<T>(&mut self, field: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.errors.push(DataError::missing(&self.file, field));
        }
        value
    }

    fn finite(&mut self, field: &'static str, value: f64) -> Option<f64> {
        if value.is_finite() {
            Some(value)
        } else {
            self.errors.push(DataError::not_finite(&self.file, field, value));
            None
        }
    }

    fn in_range(&mut self, field: &'static str, value: f64, min: f64, max: f64) -> Option<f64> {
        let value = self.finite(field, value)?;
        if (min..=max).contains(&value) {
            Some(value)
        } else {
            self.errors
                .push(DataError::out_of_range(&self.file, field, value, min, max));
            None
        }
    }

    fn count(&mut self, field: &'static str, value: Option<f64>, max: f64) -> f64 {
        self.present(field, value)
            .and_then(|v| self.in_range(field, v, 0.0, max))
            .map(f64::floor)
            .unwrap_or(0.0)
    }

    fn fraction(&mut self, field: &'static str, value: Option<f64>) -> f64 {
        self.present(field, value)
            .and_then(|v| self.in_range(field, v, 0.0, 1.0))
            .unwrap_or(0.0)
    }

    fn series(&mut self, field: &'static str, values: Option<Vec<f64>>) -> Vec<u32> {
        let Some(values) = self.present(field, values) else {
            return Vec::new();
        };
        values
            .into_iter()
            .map(|v| {
                self.in_range(field, v, 0.0, f64::from(u32::MAX))
                    .map(|v| v.floor() as u32)
                    .unwrap_or(0)
            })
            .collect()
    }

    fn shares(
        &mut self,
        shares: Option<BTreeMap<String, f64>>,
        total_changes: u32,
    ) -> BTreeMap<String, f64> {
        let field = "author_line_shares";
        let Some(shares) = self.present(field, shares) else {
            return BTreeMap::new();
        };
        // A file that never changed may have no attributable authors.
        if shares.is_empty() && total_changes == 0 {
            return shares;
        }

        let before = self.errors.len();
        for &share in shares.values() {
            self.in_range(field, share, 0.0, 1.0);
        }
        if self.errors.len() == before {
            let sum: f64 = shares.values().sum();
            if (sum - 1.0).abs() > SHARE_SUM_TOLERANCE {
                self.errors.push(DataError::shares_sum(&self.file, sum));
            }
        }
        shares
    }
}

impl FileSignalsInput {
    /// Validate into [`FileSignals`], reporting every problem in the record.
    ///
    /// `index` names the record in errors when its `path` is absent.
    pub fn validate(self, index: usize) -> Validated<FileSignals, DataError> {
        let file = self
            .path
            .clone()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| format!("<record {index}>"));
        let mut check = RecordCheck {
            file: file.clone(),
            errors: Vec::new(),
        };

        if self.path.as_deref().is_none_or(|p| p.trim().is_empty()) {
            check.errors.push(DataError::missing(&file, "path"));
        }

        let u32_max = f64::from(u32::MAX);
        let lines = check.count("lines", self.lines, u32_max) as usize;
        let cyclomatic_complexity =
            check.count("cyclomatic_complexity", self.cyclomatic_complexity, u32_max) as u32;
        let cognitive_complexity =
            check.count("cognitive_complexity", self.cognitive_complexity, u32_max) as u32;
        let efferent_coupling =
            check.count("efferent_coupling", self.efferent_coupling, u32_max) as u32;
        let afferent_coupling =
            check.count("afferent_coupling", self.afferent_coupling, u32_max) as u32;
        let test_coverage = check.fraction("test_coverage", self.test_coverage);
        let pagerank = check.fraction("pagerank", self.pagerank);
        let blast_radius_size =
            check.count("blast_radius_size", self.blast_radius_size, u32_max) as usize;
        let is_orphan = check.present("is_orphan", self.is_orphan).unwrap_or(false);
        let total_changes = check.count("total_changes", self.total_changes, u32_max) as u32;
        let monthly_churn = check.series("monthly_churn", self.monthly_churn);
        let author_line_shares = check.shares(self.author_line_shares, total_changes);

        let signals = FileSignals {
            path: PathBuf::from(file),
            lines,
            cyclomatic_complexity,
            cognitive_complexity,
            efferent_coupling,
            afferent_coupling,
            test_coverage,
            pagerank,
            blast_radius_size,
            is_orphan,
            total_changes,
            monthly_churn,
            author_line_shares,
        };
        validation_from_errors(signals, check.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DataProblem;
    use stillwater::Validation;

    fn complete(path: &str) -> FileSignalsInput {
        let mut shares = BTreeMap::new();
        shares.insert("ana".to_string(), 0.6);
        shares.insert("bo".to_string(), 0.4);
        FileSignalsInput {
            path: Some(path.to_string()),
            lines: Some(120.0),
            cyclomatic_complexity: Some(9.0),
            cognitive_complexity: Some(11.0),
            efferent_coupling: Some(4.0),
            afferent_coupling: Some(2.0),
            test_coverage: Some(0.8),
            pagerank: Some(0.02),
            blast_radius_size: Some(3.0),
            is_orphan: Some(false),
            total_changes: Some(12.0),
            monthly_churn: Some(vec![3.0, 4.0, 5.0]),
            author_line_shares: Some(shares),
        }
    }

    fn errors_of(input: FileSignalsInput) -> Vec<DataError> {
        match input.validate(0) {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(errors) => errors.into_vec(),
        }
    }

    #[test]
    fn test_complete_record_validates() {
        match complete("src/app.rs").validate(0) {
            Validation::Success(signals) => {
                assert_eq!(signals.path, PathBuf::from("src/app.rs"));
                assert_eq!(signals.lines, 120);
                assert_eq!(signals.monthly_churn, vec![3, 4, 5]);
                assert_eq!(signals.total_changes, 12);
            }
            Validation::Failure(errors) => panic!("unexpected errors: {:?}", errors.into_vec()),
        }
    }

    #[test]
    fn test_every_missing_field_is_reported() {
        let errors = errors_of(FileSignalsInput {
            path: Some("a.rs".to_string()),
            ..Default::default()
        });
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields.len(), 12);
        assert!(fields.contains(&"total_changes"));
        assert!(fields.contains(&"author_line_shares"));
        assert!(errors.iter().all(|e| e.file == "a.rs"));
    }

    #[test]
    fn test_missing_path_names_record_index() {
        let input = FileSignalsInput {
            path: None,
            ..complete("x")
        };
        let errors = match input.validate(7) {
            Validation::Failure(errors) => errors.into_vec(),
            Validation::Success(_) => panic!("expected failure"),
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].file, "<record 7>");
        assert_eq!(errors[0].field, "path");
    }

    #[test]
    fn test_shares_must_sum_to_one() {
        let mut input = complete("b.rs");
        let mut shares = BTreeMap::new();
        shares.insert("ana".to_string(), 0.5);
        shares.insert("bo".to_string(), 0.3);
        input.author_line_shares = Some(shares);
        let errors = errors_of(input);
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0].problem,
            DataProblem::SharesDoNotSumToOne { .. }
        ));
    }

    #[test]
    fn test_shares_within_tolerance_accepted() {
        let mut input = complete("c.rs");
        let mut shares = BTreeMap::new();
        shares.insert("ana".to_string(), 0.333);
        shares.insert("bo".to_string(), 0.333);
        shares.insert("cy".to_string(), 0.333);
        input.author_line_shares = Some(shares);
        assert!(errors_of(input).is_empty());
    }

    #[test]
    fn test_empty_shares_only_without_history() {
        let mut input = complete("d.rs");
        input.author_line_shares = Some(BTreeMap::new());
        assert_eq!(errors_of(input.clone()).len(), 1);

        input.total_changes = Some(0.0);
        assert!(errors_of(input).is_empty());
    }

    #[test]
    fn test_out_of_range_and_non_finite_values() {
        let mut input = complete("e.rs");
        input.test_coverage = Some(1.5);
        input.pagerank = Some(f64::NAN);
        input.lines = Some(-3.0);
        let errors = errors_of(input);
        assert_eq!(errors.len(), 3);
        assert!(errors
            .iter()
            .any(|e| e.field == "pagerank" && matches!(e.problem, DataProblem::NotFinite { .. })));
        assert!(errors.iter().any(|e| e.field == "test_coverage"));
        assert!(errors.iter().any(|e| e.field == "lines"));
    }

    #[test]
    fn test_round_trip_through_input_form() {
        let signals = match complete("f.rs").validate(0) {
            Validation::Success(signals) => signals,
            Validation::Failure(_) => panic!("expected success"),
        };
        let again = match FileSignalsInput::from(signals.clone()).validate(0) {
            Validation::Success(signals) => signals,
            Validation::Failure(_) => panic!("expected success"),
        };
        assert_eq!(signals, again);
    }
}
