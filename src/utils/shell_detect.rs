//! Shell detection utilities

use crate::model::ShellType;
use std::path::Path;

/// Detect shell type from an RC file name or extension
pub fn detect_from_file(path: &Path) -> Option<ShellType> {
    // First check filename for common patterns (for files without extensions)
    if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
        if filename.contains("zshrc")
            || filename.contains("zprofile")
            || filename.contains("zshenv")
        {
            return Some(ShellType::Zsh);
        }
        if filename.contains("bashrc")
            || filename.contains("bash_profile")
            || filename.contains("bash_aliases")
        {
            return Some(ShellType::Bash);
        }
    }

    // Then check extension
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        match extension.to_lowercase().as_str() {
            "sh" | "bash" => return Some(ShellType::Bash),
            "zsh" => return Some(ShellType::Zsh),
            "fish" => return Some(ShellType::Fish),
            _ => {}
        }
    }

    None
}

/// Get the appropriate shell type for the current context
pub fn get_shell_type(specified: Option<ShellType>, file_path: Option<&Path>) -> ShellType {
    // Priority: specified > file detection > environment detection > default
    if let Some(shell) = specified {
        return shell;
    }

    if let Some(path) = file_path {
        if let Some(shell) = detect_from_file(path) {
            return shell;
        }
    }

    ShellType::detect().unwrap_or(ShellType::Bash)
}
