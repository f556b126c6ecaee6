use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::RiskmapConfig;
use super::validation::validate_config_result;
use crate::errors::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".riskmap.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse a TOML document and validate it, accumulating every issue.
pub fn parse_and_validate_config(contents: &str) -> Result<RiskmapConfig> {
    let config = toml::from_str::<RiskmapConfig>(contents)
        .map_err(|e| Error::config(format!("failed to parse {CONFIG_FILE_NAME}: {e}")))?;
    validate_config_result(&config)?;
    Ok(config)
}

/// Load a configuration file from an explicit path.
///
/// Unlike discovery, a missing file here is an error.
pub fn load_config_from(path: &Path) -> Result<RiskmapConfig> {
    let contents = read_config_file(path).map_err(|e| Error::io(path, e))?;
    parse_and_validate_config(&contents).map_err(|e| match e {
        Error::Config { message, .. } => Error::config_with_path(message, path),
        other => other,
    })
}

/// `None` when the file does not exist; read and parse failures are errors.
fn try_load_config_from_path(config_path: &Path) -> Result<Option<RiskmapConfig>> {
    match read_config_file(config_path) {
        Ok(contents) => {
            let config = parse_and_validate_config(&contents).map_err(|e| match e {
                Error::Config { message, .. } => Error::config_with_path(message, config_path),
                other => other,
            })?;
            log::debug!("Loaded config from {}", config_path.display());
            Ok(Some(config))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => {
            log::warn!(
                "Failed to read config file {}: {}",
                config_path.display(),
                e
            );
            Err(Error::io(config_path, e))
        }
    }
}

pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and up to nine of its ancestors for `.riskmap.toml`.
pub fn discover_config(start: &Path) -> Result<RiskmapConfig> {
    for dir in directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH) {
        if let Some(config) = try_load_config_from_path(&dir.join(CONFIG_FILE_NAME))? {
            return Ok(config);
        }
    }
    log::debug!(
        "No config found after checking {} directories. Using default config.",
        MAX_TRAVERSAL_DEPTH
    );
    Ok(RiskmapConfig::default())
}

/// Discover configuration from the current directory.
pub fn load_config() -> Result<RiskmapConfig> {
    match std::env::current_dir() {
        Ok(dir) => discover_config(&dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            Ok(RiskmapConfig::default())
        }
    }
}

/// TOML for a freshly initialised `.riskmap.toml`.
pub fn default_config_toml() -> Result<String> {
    toml::to_string_pretty(&RiskmapConfig::default())
        .map_err(|e| Error::config(format!("failed to render default config: {e}")))
}
