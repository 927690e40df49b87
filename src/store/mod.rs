//! Line-oriented access to a shell RC file
//!
//! Only alias lines are ever interpreted. Every other line is carried through
//! a read/modify/write cycle untouched, blank lines at the end included.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::codec::{AliasCodec, CommandPolicy};
use crate::error::{Error, Result};
use crate::model::{AliasRecord, ShellDialect};
use crate::utils::path::{file_name_lossy, parent_or_current};
use crate::utils::strings::{join_lines, split_lines};

/// Permissions applied after every write: owner rw, group/other r
#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// A shell configuration file holding alias definitions
pub struct ConfigFile {
    path: PathBuf,
    codec: AliasCodec,
    policy: CommandPolicy,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>, dialect: ShellDialect) -> Self {
        Self {
            path: path.into(),
            codec: AliasCodec::new(dialect),
            policy: CommandPolicy::Permissive,
        }
    }

    /// Screen commands with `policy` before adding or replacing aliases
    pub fn with_policy(mut self, policy: CommandPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn codec(&self) -> &AliasCodec {
        &self.codec
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Create an empty file (and parent directories) if missing
    pub fn ensure_exists(&self) -> Result<()> {
        if self.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::io(format!("Failed to create {}", parent.display()), e)
            })?;
        }
        fs::write(&self.path, "")
            .map_err(|e| Error::io(format!("Failed to create {}", self.path.display()), e))?;
        self.normalize_permissions()
    }

    /// All lines of the file, without terminators
    pub fn read_lines(&self) -> Result<Vec<String>> {
        if !self.exists() {
            return Err(Error::file_not_found("Config file", &self.path));
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| Error::io(format!("Failed to read {}", self.path.display()), e))?;
        Ok(split_lines(&content).into_iter().map(String::from).collect())
    }

    /// Replace the file's content with `lines`.
    ///
    /// The new content goes to a sibling temp file that is then renamed over
    /// the target, so readers see either the old or the new file. A symlinked
    /// file is written through: the link stays and its target is replaced.
    pub fn write_lines<S: AsRef<str>>(&self, lines: &[S]) -> Result<()> {
        let target = self.write_target()?;
        let temp = parent_or_current(&target)
            .join(format!(".{}.rcalias-tmp", file_name_lossy(&target)));

        fs::write(&temp, join_lines(lines))
            .map_err(|e| Error::io(format!("Failed to write {}", temp.display()), e))?;
        if let Err(e) = fs::rename(&temp, &target) {
            let _ = fs::remove_file(&temp);
            return Err(Error::io(
                format!("Failed to replace {}", target.display()),
                e,
            ));
        }

        debug!(path = %target.display(), lines = lines.len(), "wrote config file");
        self.normalize_permissions()
    }

    /// The file a write must replace, following symlinks
    fn write_target(&self) -> Result<PathBuf> {
        match fs::symlink_metadata(&self.path) {
            Ok(meta) if meta.file_type().is_symlink() => fs::canonicalize(&self.path)
                .map_err(|e| Error::io(format!("Failed to resolve {}", self.path.display()), e)),
            _ => Ok(self.path.clone()),
        }
    }

    /// Set permissions to owner read/write, everyone else read-only
    pub fn normalize_permissions(&self) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(FILE_MODE)).map_err(
                |e| {
                    Error::io(
                        format!("Failed to set permissions on {}", self.path.display()),
                        e,
                    )
                },
            )?;
        }
        Ok(())
    }

    /// True if the owner can both read and write the file
    pub fn check_permissions(&self) -> bool {
        let Ok(metadata) = fs::metadata(&self.path) else {
            return false;
        };
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            metadata.permissions().mode() & 0o600 == 0o600
        }
        #[cfg(not(unix))]
        {
            !metadata.permissions().readonly()
        }
    }

    /// Every alias defined in the file, in file order
    pub fn load_aliases(&self) -> Result<Vec<AliasRecord>> {
        Ok(self
            .read_lines()?
            .iter()
            .filter_map(|line| self.decode_line(line))
            .collect())
    }

    /// The first definition of `name`, if any
    pub fn find_alias(&self, name: &str) -> Result<Option<AliasRecord>> {
        Ok(self.load_aliases()?.into_iter().find(|a| a.name == name))
    }

    /// Append a new alias definition
    pub fn add_alias(&self, record: &AliasRecord) -> Result<()> {
        let line = self.render(record)?;
        self.ensure_exists()?;

        let mut lines = self.read_lines()?;
        if lines
            .iter()
            .any(|l| self.decode_line(l).is_some_and(|a| a.name == record.name))
        {
            return Err(Error::Duplicate(record.name.clone()));
        }

        lines.push(line);
        self.write_lines(&lines)
    }

    /// Rewrite the first definition of `name` in place
    pub fn replace_alias(&self, name: &str, record: &AliasRecord) -> Result<()> {
        let line = self.render(record)?;
        let mut lines = self.read_lines()?;

        let index = lines
            .iter()
            .position(|l| self.decode_line(l).is_some_and(|a| a.name == name))
            .ok_or_else(|| Error::not_found("Alias", name))?;

        lines[index] = line;
        self.write_lines(&lines)
    }

    /// Drop every line defining `name`, returning how many were removed
    pub fn remove_alias(&self, name: &str) -> Result<usize> {
        let lines = self.read_lines()?;
        let before = lines.len();

        let kept: Vec<String> = lines
            .into_iter()
            .filter(|l| !self.decode_line(l).is_some_and(|a| a.name == name))
            .collect();

        let removed = before - kept.len();
        if removed == 0 {
            return Err(Error::not_found("Alias", name));
        }

        self.write_lines(&kept)?;
        Ok(removed)
    }

    fn decode_line(&self, line: &str) -> Option<AliasRecord> {
        if !AliasCodec::is_alias_line(line) {
            return None;
        }
        self.codec.decode(line)
    }

    /// Validate a record and screen its command without writing anything
    pub fn screen(&self, record: &AliasRecord) -> Result<()> {
        AliasCodec::check(record)?;
        // Escaped inner quotes of the outer kind end the value early on read
        if record.command.contains('\'') && record.command.contains('"') {
            return Err(Error::validation(
                "alias command",
                "cannot contain both single and double quotes",
            ));
        }
        self.policy.check(&record.command)
    }

    /// A description is kept as a trailing comment
    fn render(&self, record: &AliasRecord) -> Result<String> {
        self.screen(record)?;
        let line = self.codec.format(record)?;

        Ok(match record.description.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => {
                format!("{}  # {}", line, text.replace(['\n', '\r'], " "))
            }
            _ => line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = "# ~/.bashrc\nexport EDITOR=vim\nalias ll='ls -la'\n\nalias gs=\"git status\"  \nif [ -f ~/.local ]; then\n  . ~/.local\nfi\n";

    fn sample_file(dir: &Path) -> ConfigFile {
        let path = dir.join(".bashrc");
        fs::write(&path, SAMPLE).unwrap();
        ConfigFile::new(path, ShellDialect::PosixEquals)
    }

    #[test]
    fn test_load_aliases() {
        let dir = tempdir().unwrap();
        let file = sample_file(dir.path());

        let aliases = file.load_aliases().unwrap();
        assert_eq!(
            aliases,
            vec![
                AliasRecord::new("ll", "ls -la"),
                AliasRecord::new("gs", "git status"),
            ]
        );
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let file = ConfigFile::new(dir.path().join(".zshrc"), ShellDialect::PosixEquals);
        assert!(file.read_lines().unwrap_err().is_not_found());
    }

    #[test]
    fn test_add_alias_keeps_other_lines() {
        let dir = tempdir().unwrap();
        let file = sample_file(dir.path());

        file.add_alias(&AliasRecord::new("k", "kubectl")).unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, format!("{}alias k='kubectl'\n", SAMPLE));
    }

    #[test]
    fn test_add_duplicate_rejected() {
        let dir = tempdir().unwrap();
        let file = sample_file(dir.path());

        let err = file.add_alias(&AliasRecord::new("ll", "ls -l")).unwrap_err();
        assert!(matches!(err, Error::Duplicate(name) if name == "ll"));
    }

    #[test]
    fn test_add_invalid_rejected_without_touching_file() {
        let dir = tempdir().unwrap();
        let file = sample_file(dir.path());

        assert!(file
            .add_alias(&AliasRecord::new("bad name", "ls"))
            .unwrap_err()
            .is_validation());
        assert_eq!(fs::read_to_string(file.path()).unwrap(), SAMPLE);
    }

    #[test]
    fn test_add_creates_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fish").join("config.fish");
        let file = ConfigFile::new(&path, ShellDialect::SpaceDelimited);

        file.add_alias(&AliasRecord::new("ll", "ls -la")).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "alias ll 'ls -la'\n");
        assert_eq!(
            file.load_aliases().unwrap(),
            vec![AliasRecord::new("ll", "ls -la")]
        );
    }

    #[test]
    fn test_description_round_trips_as_comment() {
        let dir = tempdir().unwrap();
        let file = sample_file(dir.path());

        file.add_alias(&AliasRecord::new("k", "kubectl").with_description("cluster\ntool"))
            .unwrap();

        let lines = file.read_lines().unwrap();
        assert_eq!(lines.last().unwrap(), "alias k='kubectl'  # cluster tool");
        let found = file.find_alias("k").unwrap().unwrap();
        assert_eq!(found.description.as_deref(), Some("cluster tool"));
    }

    #[test]
    fn test_policy_blocks_add() {
        let dir = tempdir().unwrap();
        let file = sample_file(dir.path()).with_policy(CommandPolicy::strict());

        let err = file
            .add_alias(&AliasRecord::new("now", "echo $(date)"))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_replace_alias_in_place() {
        let dir = tempdir().unwrap();
        let file = sample_file(dir.path());

        file.replace_alias("ll", &AliasRecord::new("ll", "ls -lah"))
            .unwrap();

        let lines = file.read_lines().unwrap();
        assert_eq!(lines[2], "alias ll='ls -lah'");
        assert_eq!(lines.len(), SAMPLE.lines().count());
        assert!(file
            .replace_alias("nope", &AliasRecord::new("nope", "x"))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_remove_alias() {
        let dir = tempdir().unwrap();
        let file = sample_file(dir.path());

        assert_eq!(file.remove_alias("gs").unwrap(), 1);
        let content = fs::read_to_string(file.path()).unwrap();
        assert!(!content.contains("git status"));
        assert!(content.contains("alias ll='ls -la'"));
        assert!(content.contains("  . ~/.local"));

        assert!(file.remove_alias("gs").unwrap_err().is_not_found());
    }

    #[test]
    fn test_mixed_quotes_rejected() {
        let dir = tempdir().unwrap();
        let file = sample_file(dir.path());

        let err = file
            .add_alias(&AliasRecord::new("say", r#"echo "it's""#))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(fs::read_to_string(file.path()).unwrap(), SAMPLE);

        // Either quote kind on its own is fine
        file.add_alias(&AliasRecord::new("hi", r#"echo "hi""#)).unwrap();
        file.add_alias(&AliasRecord::new("its", "echo it's")).unwrap();
        assert_eq!(file.find_alias("its").unwrap().unwrap().command, "echo it's");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_through_symlink() {
        let dir = tempdir().unwrap();
        let real = dir.path().join("dotfiles_bashrc");
        fs::write(&real, "export A=1\n").unwrap();
        let link = dir.path().join(".bashrc");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let file = ConfigFile::new(&link, ShellDialect::PosixEquals);
        file.add_alias(&AliasRecord::new("ll", "ls -la")).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(
            fs::read_to_string(&real).unwrap(),
            "export A=1\nalias ll='ls -la'\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_write_normalizes_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let file = sample_file(dir.path());
        fs::set_permissions(file.path(), fs::Permissions::from_mode(0o600)).unwrap();

        file.write_lines(&["alias a='b'"]).unwrap();
        let mode = fs::metadata(file.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
        assert!(file.check_permissions());
    }
}
