use crate::config::{default_config_toml, CONFIG_FILE_NAME};
use crate::errors::{Error, Result};
use std::path::{Path, PathBuf};

/// Write the default configuration into `dir`, returning the file path.
pub fn init_config(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        return Err(Error::config_with_path(
            "configuration file already exists; use --force to overwrite",
            config_path,
        ));
    }

    let contents = format!(
        "# riskmap configuration\n# Every key is optional; omitted keys keep these defaults.\n\n{}",
        default_config_toml()?
    );
    std::fs::write(&config_path, contents).map_err(|e| Error::io(&config_path, e))?;
    Ok(config_path)
}
