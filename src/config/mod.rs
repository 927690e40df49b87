//! Configuration management module

use anyhow::Result;
use std::path::PathBuf;

use crate::model::Config;

/// Ensure the configuration directory exists
pub fn ensure_config_dir() -> Result<PathBuf> {
    let config_path = Config::config_path();
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(config_path)
}

/// Load configuration, writing the defaults out on first run
pub fn load_or_create_config() -> Result<Config> {
    let config_path = Config::config_path();

    if config_path.exists() {
        return Config::load();
    }

    let config = Config::default();
    // A read-only config dir must not stop the tool from working
    if let Err(e) = save_config(&config) {
        tracing::debug!(error = %e, "could not write default config");
    }
    Ok(config)
}

/// Save configuration
pub fn save_config(config: &Config) -> Result<()> {
    ensure_config_dir()?;
    config.save()
}
