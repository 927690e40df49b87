//! Line splitting and joining for RC file content

/// Split file content into lines, keeping blank lines at the end of the file.
///
/// `str::lines()` drops every trailing blank line, which would silently shrink
/// an RC file on each rewrite. Here only the final line terminator is dropped:
///
/// ```
/// use rcalias::utils::strings::split_lines;
///
/// assert_eq!(split_lines("a\nb"), vec!["a", "b"]);
/// assert_eq!(split_lines("a\n"), vec!["a"]);
/// assert_eq!(split_lines("a\n\n"), vec!["a", ""]);
/// assert_eq!(split_lines(""), Vec::<&str>::new());
/// ```
pub fn split_lines(s: &str) -> Vec<&str> {
    if s.is_empty() {
        return Vec::new();
    }

    let mut result: Vec<&str> = s.split('\n').collect();

    // The piece after the final '\n' is the terminator, not a line
    if s.ends_with('\n') && result.last() == Some(&"") {
        result.pop();
    }

    result
}

/// Join lines back into file content, terminating every line with `\n`.
///
/// `join_lines(&split_lines(s)) == s` for any `s` that is empty or ends
/// with a newline.
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line.as_ref());
        out.push('\n');
    }
    out
}
