//! Configuration file management for Draftloop.
//!
//! Reads client settings from `~/.config/draftloop/config.toml`, then applies
//! environment overrides.

use draftloop_core::config::ClientConfig;
use draftloop_core::error::{DraftloopError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides `base_url` when set.
pub const BASE_URL_ENV: &str = "DRAFTLOOP_BASE_URL";

/// Loads configuration from `path` (or the default location when `None`),
/// then applies overrides from the process environment.
pub fn load_client_config(path: Option<&Path>) -> Result<ClientConfig> {
    let config = match path {
        Some(path) => load_config_from_path(path)?,
        None => load_config_from_path(&get_config_path()?)?,
    };
    Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
}

/// Loads configuration from `path`.
///
/// A missing file yields defaults; an unreadable or malformed one is an error.
pub fn load_config_from_path(path: &Path) -> Result<ClientConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No configuration file, using defaults");
        return Ok(ClientConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config = toml::from_str(&content)?;
    Ok(config)
}

/// Applies environment overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(mut config: ClientConfig, lookup: F) -> ClientConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base_url) = lookup(BASE_URL_ENV).filter(|value| !value.trim().is_empty()) {
        config.base_url = base_url;
    }
    config
}

/// Returns the path to the configuration file: ~/.config/draftloop/config.toml
pub fn get_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DraftloopError::config("Could not determine home directory"))?;
    Ok(home.join(".config").join("draftloop").join("config.toml"))
}
