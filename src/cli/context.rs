//! Command execution context

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;
use std::path::PathBuf;

use crate::backup::BackupManager;
use crate::cli::args::{Cli, ConflictStrategy};
use crate::codec::CommandPolicy;
use crate::model::{Config, ShellType};
use crate::store::ConfigFile;
use crate::utils::path::normalize_path;
use crate::utils::shell_detect::get_shell_type;

/// Common context for command execution
pub struct Context {
    pub config: Config,
    pub shell_type: ShellType,
    pub config_file: PathBuf,
    pub on_conflict: ConflictStrategy,
    pub assume_yes: bool,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => Config::load_from(path)?,
            None => crate::config::load_or_create_config()?,
        };
        if !config.ui.color {
            colored::control::set_override(false);
        }

        let shell_type = get_shell_type(cli.shell.map(|s| s.into()), cli.file.as_deref());
        let config_file = match &cli.file {
            Some(file) => normalize_path(&file.to_string_lossy()),
            None => shell_type.default_config_path(),
        };

        Ok(Self {
            config,
            shell_type,
            config_file,
            on_conflict: cli.on_conflict,
            assume_yes: cli.yes,
        })
    }

    /// Store for the managed file, screening commands with the configured policy
    pub fn store(&self) -> Result<ConfigFile> {
        let policy = CommandPolicy::from_config(&self.config.policy)?;
        Ok(ConfigFile::new(&self.config_file, self.shell_type.dialect()).with_policy(policy))
    }

    /// Get a BackupManager instance
    pub fn backup_manager(&self) -> BackupManager {
        BackupManager::from_config(&self.config_file, &self.config.backup)
    }

    /// Snapshot the managed file before a modification.
    ///
    /// A file that does not exist yet has nothing to protect. Any other
    /// failure aborts the caller.
    pub fn snapshot(&self) -> Result<Option<PathBuf>> {
        if !self.config_file.exists() {
            return Ok(None);
        }
        match self.backup_manager().create_backup() {
            Ok(path) => Ok(Some(path)),
            Err(e) => anyhow::bail!("Failed to create backup, nothing was changed: {}", e),
        }
    }

    /// Ask for confirmation unless `--yes` was given
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        Ok(Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    /// Print a success message
    pub fn print_success(&self, message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print a warning message
    pub fn print_warning(&self, message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Print an error message
    pub fn print_error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print reload hint after modifying configuration
    pub fn print_reload_hint(&self) {
        println!(
            "{} {}",
            "→".cyan(),
            format!(
                "Run 'source {}' to apply changes to the current shell",
                self.config_file.display()
            )
            .dimmed()
        );
    }
}
