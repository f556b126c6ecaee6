//! Signal bundle input.
//!
//! A bundle is one JSON document holding everything a run needs:
//!
//! ```json
//! {
//!   "files": [{"path": "src/lib.rs", "lines": 120, "total_changes": 4, "...": "..."}],
//!   "pairs": {"modules": {"src/lib.rs": "core"}, "pairs": [{"a": "...", "b": "..."}]},
//!   "architecture": {"modularity": 0.41, "cycle_count": 2}
//! }
//! ```
//!
//! Only `files` is required. Record-level checks happen later, during
//! snapshot construction, so a bundle that parses may still be rejected.

use crate::core::FileSignalsInput;
use crate::errors::{Error, Result};
use crate::mismatch::PairTables;
use crate::priority::ArchitectureSignals;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalBundle {
    pub files: Vec<FileSignalsInput>,
    #[serde(default)]
    pub pairs: PairTables,
    #[serde(default)]
    pub architecture: ArchitectureSignals,
}

/// Parse a bundle; `source` only labels errors.
pub fn parse_bundle(contents: &str, source: &Path) -> Result<SignalBundle> {
    serde_json::from_str(contents).map_err(|e| Error::parse(source, e.to_string()))
}

pub fn read_bundle(path: &Path) -> Result<SignalBundle> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let bundle = parse_bundle(&contents, path)?;
    log::debug!(
        "Read {} file records and {} pair rows from {}",
        bundle.files.len(),
        bundle.pairs.records().len(),
        path.display()
    );
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::io::Write;

    #[test]
    fn test_minimal_bundle() {
        let bundle = parse_bundle(
            r#"{"files": [{"path": "a.rs", "lines": 10}]}"#,
            Path::new("inline"),
        )
        .unwrap();
        assert_eq!(bundle.files.len(), 1);
        assert_eq!(bundle.files[0].lines, Some(10.0));
        assert!(bundle.pairs.is_empty());
        assert_eq!(bundle.architecture, ArchitectureSignals::default());
    }

    #[test]
    fn test_full_bundle_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            indoc! {r#"
                {
                  "files": [
                    {"path": "a.rs", "total_changes": 3, "author_line_shares": {"ana": 1.0}},
                    {"path": "b.rs"}
                  ],
                  "pairs": {
                    "modules": {"a.rs": "core", "b.rs": "cli"},
                    "pairs": [{"a": "a.rs", "b": "b.rs", "cochange_support": 0.4}]
                  },
                  "architecture": {"modularity": 0.2, "cycle_count": 1}
                }
            "#}
            .as_bytes(),
        )
        .unwrap();

        let bundle = read_bundle(file.path()).unwrap();
        assert_eq!(bundle.files.len(), 2);
        assert_eq!(bundle.pairs.records().len(), 1);
        assert_eq!(bundle.architecture.modularity, Some(0.2));
        assert_eq!(bundle.architecture.cycle_count, Some(1));
    }

    #[test]
    fn test_parse_error_names_source() {
        let err = parse_bundle("{\"files\": 3}", Path::new("bundle.json")).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(err.to_string().contains("bundle.json"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_bundle(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
