//! Backslash escaping for alias commands

/// Characters that get a backslash in front of them when an alias is written
pub const ESCAPED_CHARS: [char; 8] = ['\'', '"', '\\', '$', '`', '!', '*', '?'];

/// Prefix every quote, backslash, and expansion metacharacter with `\`
pub fn escape_command(command: &str) -> String {
    let mut escaped = String::with_capacity(command.len() * 2);
    for c in command.chars() {
        if ESCAPED_CHARS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Drop each backslash and keep the character after it literally.
///
/// A lone backslash at the very end has nothing to escape and is kept as-is.
pub fn unescape(s: &str) -> String {
    let mut unescaped = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some(next) => unescaped.push(next),
            None => unescaped.push('\\'),
        }
    }

    unescaped
}
