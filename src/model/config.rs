//! Application configuration structures

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub backup: BackupConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// UI configuration options
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UiConfig {
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_color() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            color: default_color(),
        }
    }
}

/// Backup configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackupConfig {
    /// Backups beyond this rank are deleted
    #[serde(default = "default_max_count")]
    pub max_count: usize,
    /// The newest `raw_count` backups stay uncompressed
    #[serde(default = "default_raw_count")]
    pub raw_count: usize,
    /// Override for the backup directory (defaults to `~/.shellbackup`)
    #[serde(default)]
    pub dir: Option<String>,
    /// Compression program, invoked with xz-compatible flags
    #[serde(default = "default_compressor")]
    pub compressor: String,
}

fn default_max_count() -> usize {
    20
}

fn default_raw_count() -> usize {
    10
}

fn default_compressor() -> String {
    "xz".to_string()
}

impl Default for BackupConfig {
    fn default() -> Self {
        BackupConfig {
            max_count: default_max_count(),
            raw_count: default_raw_count(),
            dir: None,
            compressor: default_compressor(),
        }
    }
}

/// How alias commands are screened before being written
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    #[default]
    Permissive,
    Deny,
    Allow,
}

/// Command policy configuration
///
/// In `deny` mode `patterns` are regular expressions; an empty list falls
/// back to the built-in set of dangerous constructs. In `allow` mode they are
/// the program names a command may start with.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PolicyConfig {
    #[serde(default)]
    pub mode: PolicyMode,
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl Config {
    /// Get the rcalias configuration directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("~"))
                    .join(".config")
            })
            .join("rcalias")
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from the default location
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from file, or return default if file doesn't exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
