//! Shell type detection, configuration paths, and alias dialects

use std::env;
use std::path::PathBuf;

/// Alias syntax variant used when writing definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShellDialect {
    /// `alias name='cmd'` (bash, zsh)
    #[default]
    PosixEquals,
    /// `alias name 'cmd'` (fish)
    SpaceDelimited,
    /// Unrecognized shell; written like `PosixEquals`
    Unknown,
}

/// Supported shell types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
}

impl ShellType {
    /// Detect shell type from environment
    pub fn detect() -> Option<Self> {
        // Version variables are only set inside the running shell itself
        if env::var("BASH_VERSION").is_ok() {
            return Some(ShellType::Bash);
        }
        if env::var("ZSH_VERSION").is_ok() {
            return Some(ShellType::Zsh);
        }
        if env::var("FISH_VERSION").is_ok() {
            return Some(ShellType::Fish);
        }

        // Fall back to the login shell
        if let Ok(shell) = env::var("SHELL") {
            return Self::from_program(&shell);
        }

        None
    }

    /// Match a shell program path such as `/usr/bin/zsh`
    pub fn from_program(program: &str) -> Option<Self> {
        let name = program
            .rsplit('/')
            .next()
            .unwrap_or(program)
            .to_lowercase();

        if name.contains("zsh") {
            Some(ShellType::Zsh)
        } else if name.contains("bash") {
            Some(ShellType::Bash)
        } else if name.contains("fish") {
            Some(ShellType::Fish)
        } else {
            None
        }
    }

    /// Get the default configuration file path for this shell
    pub fn default_config_path(&self) -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));
        match self {
            ShellType::Bash => home.join(".bashrc"),
            ShellType::Zsh => home.join(".zshrc"),
            ShellType::Fish => home.join(".config").join("fish").join("config.fish"),
        }
    }

    /// Alias dialect written by this shell
    pub fn dialect(&self) -> ShellDialect {
        match self {
            ShellType::Bash | ShellType::Zsh => ShellDialect::PosixEquals,
            ShellType::Fish => ShellDialect::SpaceDelimited,
        }
    }

    /// Get shell name as string
    pub fn name(&self) -> &'static str {
        match self {
            ShellType::Bash => "bash",
            ShellType::Zsh => "zsh",
            ShellType::Fish => "fish",
        }
    }
}

impl std::fmt::Display for ShellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ShellType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bash" => Ok(ShellType::Bash),
            "zsh" => Ok(ShellType::Zsh),
            "fish" => Ok(ShellType::Fish),
            _ => Err(format!("Unknown shell type: {}", s)),
        }
    }
}
