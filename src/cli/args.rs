//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rcalias")]
#[command(about = "Shell alias manager - edit aliases in your RC file with automatic backups")]
#[command(version)]
#[command(author)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Shell configuration file to manage
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Shell type (detected from the file name or environment if omitted)
    #[arg(short, long, global = true)]
    pub shell: Option<ShellArg>,

    /// What to do when an alias already exists
    #[arg(long, global = true, default_value = "ask")]
    pub on_conflict: ConflictStrategy,

    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// rcalias config file (defaults to <config dir>/rcalias/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List aliases
    #[command(visible_alias = "ls")]
    List {
        /// Only show aliases whose name, command, or description contains this text
        filter: Option<String>,
    },

    /// Add an alias
    Add {
        /// NAME=COMMAND
        definition: String,
        /// Description kept alongside the alias in listings
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Remove an alias
    #[command(visible_alias = "rm")]
    Remove {
        /// Alias name
        name: String,
    },

    /// Backup management
    Backup {
        #[command(subcommand)]
        backup_command: BackupCommands,
    },
}

#[derive(Subcommand)]
pub enum BackupCommands {
    /// Snapshot the configuration file now
    Create,
    /// List backups, newest first
    List,
    /// Restore a backup (the newest one if no path is given)
    Restore {
        /// Backup file to restore
        path: Option<PathBuf>,
    },
    /// Compress and prune old backups
    Rotate {
        /// Number of backups to keep (compressed beyond the newest few)
        #[arg(long)]
        max: Option<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ShellArg {
    Bash,
    Zsh,
    Fish,
}

impl From<ShellArg> for crate::model::ShellType {
    fn from(arg: ShellArg) -> Self {
        match arg {
            ShellArg::Bash => crate::model::ShellType::Bash,
            ShellArg::Zsh => crate::model::ShellType::Zsh,
            ShellArg::Fish => crate::model::ShellType::Fish,
        }
    }
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum ConflictStrategy {
    #[default]
    Ask,
    Skip,
    Overwrite,
}
