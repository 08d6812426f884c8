use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::types::Config;
use crate::utils::error::{AlvuError, Result};

/// Configuration file names to look for, first match wins
pub const CONFIG_FILES: [&str; 3] = ["alvu.yml", "alvu.yaml", "alvu.toml"];

/// Load the site configuration for `source_dir`.
///
/// Values come from the first config file found in `source_dir`, or the
/// defaults when there is none. `source` always ends up as `source_dir`.
pub fn load_config<P: AsRef<Path>>(source_dir: P) -> Result<Config> {
    let source_dir = source_dir.as_ref();

    let mut config = match find_config_file(source_dir) {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            parse_config_file(&path)?
        }
        None => {
            debug!("No configuration file found, using defaults");
            Config::default()
        }
    };

    config.source = source_dir.to_path_buf();
    debug!("Configuration loaded: {:?}", config);
    Ok(config)
}

/// First of `CONFIG_FILES` present in `source_dir`
pub fn find_config_file<P: AsRef<Path>>(source_dir: P) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| source_dir.as_ref().join(name))
        .find(|path| path.is_file())
}

fn parse_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        AlvuError::Config(format!("Failed to read configuration file {}: {}", path.display(), e))
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => parse_toml_config(&content, path),
        _ => parse_yaml_config(&content, path),
    }
}

/// Parse a YAML configuration file
fn parse_yaml_config(content: &str, path: &Path) -> Result<Config> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(content).map_err(|e| {
        AlvuError::Config(format!(
            "Failed to parse YAML configuration ({}): {}",
            path.display(),
            e
        ))
    })
}

/// Parse a TOML configuration file
fn parse_toml_config(content: &str, path: &Path) -> Result<Config> {
    toml::from_str(content).map_err(|e| {
        AlvuError::Config(format!(
            "Failed to parse TOML configuration ({}): {}",
            path.display(),
            e
        ))
    })
}
