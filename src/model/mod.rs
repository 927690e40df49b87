//! Core data models for rcalias

mod alias;
mod config;
mod shell;

pub use alias::AliasRecord;
pub use config::{BackupConfig, Config, PolicyConfig, PolicyMode, UiConfig};
pub use shell::{ShellDialect, ShellType};
