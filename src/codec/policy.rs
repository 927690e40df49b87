//! Command screening policy
//!
//! [`AliasCodec::validate_command`](super::AliasCodec::validate_command) only
//! checks length, so an alias may contain any shell syntax at all. Callers
//! that write to a user's RC file run the command through a
//! [`CommandPolicy`] first; the default is permissive.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{PolicyConfig, PolicyMode};

lazy_static! {
    /// Built-in deny set used when `deny` mode has no patterns of its own
    static ref DANGEROUS_CONSTRUCTS: Vec<Regex> = [
        // Command substitution: $(...)
        r"\$\(",
        // Legacy command substitution: `...`
        r"`",
        // Recursive forced delete in either flag order
        r"\brm\s+-[A-Za-z]*(r[A-Za-z]*f|f[A-Za-z]*r)",
        // Piping into a shell interpreter
        r"\|\s*(sudo\s+)?(ba|z|da|k)?sh\b",
        // eval of arbitrary text
        r"\beval\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();
}

/// Decides whether an alias command may be written
#[derive(Debug, Clone, Default)]
pub enum CommandPolicy {
    /// Accept every command
    #[default]
    Permissive,
    /// Reject commands matching any pattern
    DenyList(Vec<Regex>),
    /// Accept only commands whose program is listed
    AllowList(Vec<String>),
}

impl CommandPolicy {
    /// Deny list made of the built-in dangerous constructs
    pub fn strict() -> Self {
        CommandPolicy::DenyList(DANGEROUS_CONSTRUCTS.clone())
    }

    /// Build a policy from the `[policy]` config section
    pub fn from_config(config: &PolicyConfig) -> Result<Self> {
        match config.mode {
            PolicyMode::Permissive => Ok(CommandPolicy::Permissive),
            PolicyMode::Deny if config.patterns.is_empty() => Ok(Self::strict()),
            PolicyMode::Deny => {
                let patterns = config
                    .patterns
                    .iter()
                    .map(|p| {
                        Regex::new(p).map_err(|e| {
                            Error::validation("policy pattern", format!("'{}': {}", p, e))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(CommandPolicy::DenyList(patterns))
            }
            PolicyMode::Allow => Ok(CommandPolicy::AllowList(config.patterns.clone())),
        }
    }

    /// Check a command against the policy
    pub fn check(&self, command: &str) -> Result<()> {
        match self {
            CommandPolicy::Permissive => Ok(()),
            CommandPolicy::DenyList(patterns) => match patterns.iter().find(|re| re.is_match(command)) {
                Some(re) => Err(Error::validation(
                    "alias command",
                    format!("matches denied pattern '{}'", re.as_str()),
                )),
                None => Ok(()),
            },
            CommandPolicy::AllowList(programs) => {
                let program = program_of(command);
                if programs.iter().any(|p| p == program) {
                    Ok(())
                } else {
                    Err(Error::validation(
                        "alias command",
                        format!("program '{}' is not in the allow list", program),
                    ))
                }
            }
        }
    }
}

/// First word of a command with any directory stripped (`/usr/bin/git` -> `git`)
fn program_of(command: &str) -> &str {
    let first = command.split_whitespace().next().unwrap_or("");
    first.rsplit('/').next().unwrap_or(first)
}
