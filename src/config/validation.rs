use log::{debug, info};

use crate::config::Config;
use crate::utils::error::{AlvuError, Result};

/// Validate the configuration before a build
pub fn validate_config(config: &Config) -> Result<()> {
    validate_source_directory(config)?;
    validate_pages_directory(config)?;
    validate_dev_server(config)?;
    Ok(())
}

/// The source directory must exist and be a directory
fn validate_source_directory(config: &Config) -> Result<()> {
    let source = &config.source;

    if !source.exists() {
        return Err(AlvuError::Config(format!(
            "Source directory does not exist: {}",
            source.display()
        )));
    }

    if !source.is_dir() {
        return Err(AlvuError::Config(format!(
            "Source path is not a directory: {}",
            source.display()
        )));
    }

    std::fs::read_dir(source).map_err(|e| {
        AlvuError::Config(format!(
            "Source directory is not readable: {}: {}",
            source.display(),
            e
        ))
    })?;

    debug!("Source directory: {}", source.display());
    Ok(())
}

/// Pages are the whole point of a build
fn validate_pages_directory(config: &Config) -> Result<()> {
    let pages = config.pages_dir();
    if !pages.is_dir() {
        return Err(AlvuError::Config(format!(
            "No pages directory found at {}",
            pages.display()
        )));
    }
    info!("Pages directory: {}", pages.display());
    Ok(())
}

fn validate_dev_server(config: &Config) -> Result<()> {
    if config.poll_interval_ms == 0 {
        return Err(AlvuError::Config("poll interval must be greater than 0".to_string()));
    }
    if config.port == 0 {
        return Err(AlvuError::Config("port must be greater than 0".to_string()));
    }
    Ok(())
}
