//! Alias record data structure

use serde::{Deserialize, Serialize};

use crate::utils::clock;

/// A single alias definition
///
/// Only `name` and `command` take part in equality. Two records describing
/// the same `alias name='command'` definition are the same alias regardless
/// of when they were created or what description they carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasRecord {
    pub name: String,
    pub command: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub last_used_at: String,
}

fn default_enabled() -> bool {
    true
}

impl AliasRecord {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        let today = clock::today();
        Self {
            name: name.into(),
            command: command.into(),
            description: None,
            enabled: true,
            created_at: today.clone(),
            last_used_at: today,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Case-insensitive match against name, command, or description
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.command.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(&needle))
                .unwrap_or(false)
    }
}

impl PartialEq for AliasRecord {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.command == other.command
    }
}

impl Eq for AliasRecord {}
