//! Path utilities

use std::path::{Path, PathBuf};

/// Expand tilde (~) in path to home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped.trim_start_matches('/'));
        }
    }
    PathBuf::from(path)
}

/// Normalize a path (expand tilde, resolve relative paths)
pub fn normalize_path(path: &str) -> PathBuf {
    let expanded = expand_tilde(path);
    if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(expanded)
    }
}

/// File name of `path` as a lossy string, empty when there is none
pub fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Parent directory of `path`, `.` for bare file names
pub fn parent_or_current(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Append `suffix` to the final component (`a.bak1` -> `a.bak1.xz`)
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/.bashrc");
        assert!(!path.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_normalize_absolute_path() {
        let path = normalize_path("/etc/passwd");
        assert_eq!(path, PathBuf::from("/etc/passwd"));
    }

    #[test]
    fn test_parent_or_current() {
        assert_eq!(parent_or_current(Path::new(".bashrc")), PathBuf::from("."));
        assert_eq!(
            parent_or_current(Path::new("/home/u/.bashrc")),
            PathBuf::from("/home/u")
        );
    }

    #[test]
    fn test_with_suffix() {
        assert_eq!(
            with_suffix(Path::new("/b/.zshrc.bak20240101_000000"), ".xz"),
            PathBuf::from("/b/.zshrc.bak20240101_000000.xz")
        );
    }
}
