//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::ScoutConfig;
use crate::error::{Result, ScoutError};

/// Directory holding the project configuration.
pub const CONFIG_DIR: &str = ".appscout";

/// File name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yml";

/// A configuration plus the file it came from, if any.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ScoutConfig,
    /// `None` when built-in defaults are in use.
    pub source: Option<PathBuf>,
}

/// Find `.appscout/config.yml` by walking up from `start`.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let candidate = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<ScoutConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ScoutError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ScoutError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content. An empty document yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<ScoutConfig> {
    if content.trim().is_empty() {
        return Ok(ScoutConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| ScoutError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load config with optional path override.
///
/// An explicit path must exist. Without one, the nearest
/// `.appscout/config.yml` above `start` is used, or the defaults when there
/// is none.
pub fn load_config(start: &Path, config_override: Option<&Path>) -> Result<LoadedConfig> {
    let path = match config_override {
        Some(path) => Some(path.to_path_buf()),
        None => find_config(start),
    };

    match path {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            Ok(LoadedConfig {
                config: load_config_file(&path)?,
                source: Some(path),
            })
        }
        None => {
            tracing::debug!("No config file found, using defaults");
            Ok(LoadedConfig {
                config: ScoutConfig::default(),
                source: None,
            })
        }
    }
}
