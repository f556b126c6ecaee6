//! Where rendered reports go.
//!
//! Writers take an [`OutputDestination`] rather than a path so the binary
//! can target stdout or a file, and tests can capture output in memory.

use crate::errors::{Error, Result};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

pub trait OutputDestination: Send + Sync {
    fn write_str(&self, content: &str) -> Result<()>;

    fn flush(&self) -> Result<()>;

    /// Human-readable target, for log messages.
    fn description(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct FileDestination {
    path: PathBuf,
}

impl FileDestination {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl OutputDestination for FileDestination {
    fn write_str(&self, content: &str) -> Result<()> {
        std::fs::write(&self.path, content).map_err(|e| Error::io(&self.path, e))
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn description(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// In-memory buffer, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryDestination {
    buffer: Arc<RwLock<String>>,
}

impl MemoryDestination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_content(&self) -> String {
        self.buffer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl OutputDestination for MemoryDestination {
    fn write_str(&self, content: &str) -> Result<()> {
        self.buffer
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(content);
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn description(&self) -> String {
        "memory".to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutDestination;

impl OutputDestination for StdoutDestination {
    fn write_str(&self, content: &str) -> Result<()> {
        io::stdout()
            .lock()
            .write_all(content.as_bytes())
            .map_err(|e| Error::io("<stdout>", e))
    }

    fn flush(&self) -> Result<()> {
        io::stdout()
            .lock()
            .flush()
            .map_err(|e| Error::io("<stdout>", e))
    }

    fn description(&self) -> String {
        "stdout".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_destination_accumulates() {
        let dest = MemoryDestination::new();
        assert!(dest.is_empty());
        dest.write_str("a").unwrap();
        dest.write_str("b").unwrap();
        assert_eq!(dest.get_content(), "ab");
        assert_eq!(dest.description(), "memory");
    }

    #[test]
    fn test_file_destination_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let dest = FileDestination::new(path.clone());
        dest.write_str("{}").unwrap();
        dest.flush().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
        assert!(dest.description().starts_with("file:"));
    }

    #[test]
    fn test_file_destination_reports_missing_directory() {
        let dest = FileDestination::new(PathBuf::from("/no/such/dir/report.json"));
        assert!(matches!(dest.write_str("{}"), Err(Error::Io { .. })));
    }
}
