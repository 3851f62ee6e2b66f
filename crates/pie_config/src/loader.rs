//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::PieConfig;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when no explicit path is given.
pub const CONFIG_FILE: &str = "pie.toml";

/// Loads and validates a `pie.toml` configuration from an explicit path.
pub fn load_config(path: &Path) -> Result<PieConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Loads `<dir>/pie.toml` if it exists, otherwise returns the defaults.
pub fn find_config(dir: &Path) -> Result<(PieConfig, Option<PathBuf>), ConfigError> {
    let path = dir.join(CONFIG_FILE);
    if !path.is_file() {
        return Ok((PieConfig::default(), None));
    }
    let config = load_config(&path)?;
    Ok((config, Some(path)))
}

/// Parses and validates a `pie.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<PieConfig, ConfigError> {
    let config: PieConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that cache settings can be turned into a path segment and a digest key.
fn validate_config(config: &PieConfig) -> Result<(), ConfigError> {
    let cache = &config.cache;
    validate_segment("cache.dir", &cache.dir)?;
    validate_segment("cache.tag", &cache.tag)?;
    if cache.tag.contains('.') {
        return Err(ConfigError::ValidationError(
            "cache.tag must not contain '.'".to_string(),
        ));
    }
    if cache.key.is_empty() {
        return Err(ConfigError::ValidationError(
            "cache.key must not be empty".to_string(),
        ));
    }
    if matches!(cache.tool_version.as_deref(), Some("")) {
        return Err(ConfigError::ValidationError(
            "cache.tool_version must not be empty when set".to_string(),
        ));
    }
    Ok(())
}

fn validate_segment(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "{field} must not be empty"
        )));
    }
    if value == "." || value == ".." || value.contains(['/', '\\']) {
        return Err(ConfigError::ValidationError(format!(
            "{field} must be a single path segment, got '{value}'"
        )));
    }
    Ok(())
}
