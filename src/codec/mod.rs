//! Alias line codec
//!
//! Validates alias records and converts them to and from single lines of
//! shell configuration.
//!
//! ## Line Grammar
//!
//! ```text
//! [ws] alias [ws] <name> [ws] = [ws] ('<cmd>' | "<cmd>" | <cmd>[#comment])
//! ```
//!
//! Writing always produces the quoted form. Reading is deliberately
//! forgiving: an unterminated quote runs to the end of the line instead of
//! rejecting it, because these files are edited by hand.
//!
//! ## Keyword Matching
//!
//! The `alias` keyword is matched as a prefix, with no word boundary after
//! it. `aliasfoo=1` is therefore read as an alias named `foo`.
//!
//! ## Dialects
//!
//! [`AliasCodec::parse`] only understands `alias name=cmd`. Fish writes
//! `alias name 'cmd'`, which has no `=`; [`AliasCodec::parse_space_delimited`]
//! reads that form, and [`AliasCodec::decode`] picks the right one for the
//! codec's dialect.

mod escape;
pub mod policy;

pub use escape::{escape_command, unescape, ESCAPED_CHARS};
pub use policy::CommandPolicy;

use crate::error::{Error, Result};
use crate::model::{AliasRecord, ShellDialect};

/// Longest accepted alias name, in characters
pub const MAX_NAME_LEN: usize = 255;

/// Longest accepted alias command, in characters
pub const MAX_COMMAND_LEN: usize = 2048;

const KEYWORD: &str = "alias";
const HORIZONTAL_WS: [char; 2] = [' ', '\t'];

/// Dialect-aware alias codec.
///
/// The dialect only affects writing and [`decode`](Self::decode); everything
/// else is an associated function with no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct AliasCodec {
    dialect: ShellDialect,
}

impl AliasCodec {
    pub fn new(dialect: ShellDialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> ShellDialect {
        self.dialect
    }

    /// Check an alias name: 1-255 chars, starts with `[A-Za-z0-9_]`,
    /// continues with `[A-Za-z0-9_-]`.
    pub fn validate_name(name: &str) -> bool {
        name_problem(name).is_none()
    }

    /// Check an alias command: non-empty and at most 2048 chars.
    ///
    /// Content is not inspected. Screening for dangerous constructs is the
    /// job of [`CommandPolicy`].
    pub fn validate_command(command: &str) -> bool {
        command_problem(command).is_none()
    }

    /// Validate both fields, reporting the first problem found
    pub fn check(record: &AliasRecord) -> Result<()> {
        if let Some(reason) = name_problem(&record.name) {
            return Err(Error::validation("alias name", reason));
        }
        if let Some(reason) = command_problem(&record.command) {
            return Err(Error::validation("alias command", reason));
        }
        Ok(())
    }

    /// Format a record as a line in this codec's dialect
    pub fn format(&self, record: &AliasRecord) -> Result<String> {
        Self::format_as(record, self.dialect)
    }

    /// Format a record as a line in the given dialect.
    ///
    /// The command is escaped, then wrapped in single quotes unless it
    /// contains a single quote itself, in which case double quotes are used.
    pub fn format_as(record: &AliasRecord, dialect: ShellDialect) -> Result<String> {
        Self::check(record)?;

        let escaped = escape_command(&record.command);
        let quoted = if record.command.contains('\'') {
            format!("\"{}\"", escaped)
        } else {
            format!("'{}'", escaped)
        };

        Ok(match dialect {
            ShellDialect::SpaceDelimited => format!("alias {} {}", record.name, quoted),
            ShellDialect::PosixEquals | ShellDialect::Unknown => {
                format!("alias {}={}", record.name, quoted)
            }
        })
    }

    /// Parse an `alias name=command` line.
    ///
    /// Returns `None` for lines that do not start with the keyword, have no
    /// `=`, or have an empty name. The name is not validated here. A trailing
    /// `# comment` is kept as the record's description.
    pub fn parse(line: &str) -> Option<AliasRecord> {
        let rest = strip_keyword(line)?;
        let eq = rest.find('=')?;

        let name = rest[..eq].trim_matches(&HORIZONTAL_WS[..]);
        if name.is_empty() {
            return None;
        }

        Some(record_from(name, &rest[eq + 1..]))
    }

    /// Parse a fish-style `alias name 'command'` line.
    ///
    /// `alias name=command` is accepted as well, since fish reads both.
    pub fn parse_space_delimited(line: &str) -> Option<AliasRecord> {
        let rest = strip_keyword(line)?.trim_start_matches(&HORIZONTAL_WS[..]);

        let name_end = rest
            .find(|c: char| HORIZONTAL_WS.contains(&c) || c == '=')
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        if name.is_empty() {
            return None;
        }

        let mut tail = rest[name_end..].trim_start_matches(&HORIZONTAL_WS[..]);
        if let Some(stripped) = tail.strip_prefix('=') {
            tail = stripped;
        }

        Some(record_from(name, tail))
    }

    /// Parse a line using the grammar of this codec's dialect
    pub fn decode(&self, line: &str) -> Option<AliasRecord> {
        match self.dialect {
            ShellDialect::SpaceDelimited => Self::parse_space_delimited(line),
            ShellDialect::PosixEquals | ShellDialect::Unknown => Self::parse(line),
        }
    }

    /// True if the line, after leading spaces and tabs, starts with `alias`
    pub fn is_alias_line(line: &str) -> bool {
        strip_keyword(line).is_some()
    }

    /// Content of the quoted string opening at byte `start`.
    ///
    /// Runs to the next quote of the same kind, or to the end of `text` when
    /// the quote is never closed. Empty if `start` is not a quote character.
    pub fn extract_quoted_string(text: &str, start: usize) -> String {
        let Some(tail) = text.get(start..) else {
            return String::new();
        };
        let Some(quote) = tail.chars().next().filter(|c| *c == '\'' || *c == '"') else {
            return String::new();
        };

        let body = &tail[1..];
        match body.find(quote) {
            Some(end) => body[..end].to_string(),
            None => body.to_string(),
        }
    }
}

/// Text after the `alias` keyword, if the line starts with it
fn strip_keyword(line: &str) -> Option<&str> {
    line.trim_start_matches(&HORIZONTAL_WS[..])
        .strip_prefix(KEYWORD)
}

/// Build a record from the text following the name separator.
///
/// The command is unescaped; a `# comment` after it becomes the description.
fn record_from(name: &str, after_separator: &str) -> AliasRecord {
    let (raw, rest) = split_value(after_separator);
    let mut record = AliasRecord::new(name, unescape(&raw));
    record.description = rest
        .trim_start()
        .strip_prefix('#')
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    record
}

/// Split into the raw command text and whatever follows it on the line
fn split_value(after_separator: &str) -> (String, &str) {
    let value = after_separator.trim_start_matches(&HORIZONTAL_WS[..]);

    if value.starts_with('\'') || value.starts_with('"') {
        let raw = AliasCodec::extract_quoted_string(value, 0);
        // Opening quote + body + closing quote, if the closing one exists
        let consumed = (1 + raw.len() + 1).min(value.len());
        (raw, &value[consumed..])
    } else {
        let end = value.find('#').unwrap_or(value.len());
        let raw = value[..end].trim_end_matches(&HORIZONTAL_WS[..]).to_string();
        (raw, &value[end..])
    }
}

fn name_problem(name: &str) -> Option<String> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Some("must not be empty".to_string());
    };
    let len = name.chars().count();

    if len > MAX_NAME_LEN {
        return Some(format!(
            "must be at most {} characters, got {}",
            MAX_NAME_LEN, len
        ));
    }
    if !(first.is_ascii_alphanumeric() || first == '_') {
        return Some(format!(
            "must start with a letter, digit, or underscore, got '{}'",
            first
        ));
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-')) {
        return Some(format!("contains invalid character '{}'", bad.escape_debug()));
    }
    None
}

fn command_problem(command: &str) -> Option<String> {
    let len = command.chars().count();
    if len == 0 {
        return Some("must not be empty".to_string());
    }
    if len > MAX_COMMAND_LEN {
        return Some(format!(
            "must be at most {} characters, got {}",
            MAX_COMMAND_LEN, len
        ));
    }
    None
}
