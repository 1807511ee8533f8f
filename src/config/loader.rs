use std::fs;
use std::path::PathBuf;

use color_eyre::eyre::WrapErr;
use tracing::debug;

use crate::config::AppConfig;

const CONFIG_DIR: &str = "labconsole";
const CONFIG_FILE: &str = "config.toml";

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR))
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

/// Read the user's config, falling back to defaults when there is none.
///
/// The file is never written back; view state such as page size or search
/// text is not persisted.
pub fn load() -> color_eyre::Result<AppConfig> {
    let Some(path) = config_path() else {
        debug!("No config directory found, using defaults");
        return Ok(AppConfig::default());
    };

    if !path.exists() {
        debug!(path = %path.display(), "Config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(&path)?;
    let config: AppConfig =
        toml::from_str(&content).wrap_err_with(|| format!("parsing {}", path.display()))?;
    config.table.validate()?;
    debug!(path = %path.display(), "Loaded config");
    Ok(config)
}
