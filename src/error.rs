//! Error types for rcalias
//!
//! Every library operation returns [`Result`]; nothing is stashed in hidden
//! state for the caller to fetch later.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// The main error type for rcalias operations
#[derive(Error, Debug)]
pub enum Error {
    /// An alias name or command breaks the record invariants or the command policy
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Tracked file, backup file, or named alias is absent
    #[error("{kind} not found: {identifier}")]
    NotFound {
        kind: &'static str,
        identifier: String,
    },

    /// An alias with this name is already defined
    #[error("Alias already exists: {0}")]
    Duplicate(String),

    /// Copy, create, permission, or directory failure
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The compression tool is missing or exited with a failure status
    #[error("Compression failed for {}: {reason}", path.display())]
    Compression { path: PathBuf, reason: String },
}

/// Result type alias for rcalias operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn not_found(kind: &'static str, identifier: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            identifier: identifier.into(),
        }
    }

    pub fn file_not_found(kind: &'static str, path: &Path) -> Self {
        Self::not_found(kind, path.display().to_string())
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }

    pub fn compression(path: &Path, reason: impl Into<String>) -> Self {
        Error::Compression {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }
}
