//! rcalias - Shell alias manager
//!
//! Reads and writes `alias` definitions in shell RC files (Bash, Zsh, Fish)
//! and snapshots the file before every change.
//!
//! # Features
//!
//! - Validate, format, and parse single alias lines per shell dialect
//! - List, add, replace, and remove aliases without disturbing other lines
//! - Optional screening of alias commands for dangerous constructs
//! - Timestamped backups, compressed with xz past the newest few and
//!   pruned past a cap
//! - Restore from any backup, compressed or not

pub mod backup;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod utils;

pub use backup::{BackupManager, RotationPolicy, RotationReport};
pub use codec::{AliasCodec, CommandPolicy};
pub use error::{Error, Result};
pub use model::{AliasRecord, Config, ShellDialect, ShellType};
pub use store::ConfigFile;
