//! Backup management module
//!
//! A [`BackupManager`] protects one tracked file. Every snapshot is a plain
//! copy named `<basename>.bak<YYYYMMDD_HHMMSS>` in the backup directory, and
//! each new snapshot triggers rotation:
//!
//! | rank (newest first)      | action                 |
//! |--------------------------|------------------------|
//! | `0 .. keep_raw`          | left as-is             |
//! | `keep_raw .. max`        | compressed in place    |
//! | `max ..`                 | deleted                |
//!
//! An entry only ever moves down that table: raw, then compressed, then gone.
//! Nothing here locks the directory; callers serialize their own writes.

pub mod compressor;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::BackupConfig;
use crate::utils::clock;
use crate::utils::path::{expand_tilde, file_name_lossy, parent_or_current};

pub use compressor::{Compressor, FakeCompressor, XzCompressor, COMPRESSED_SUFFIX};

/// Marker between the tracked file name and the timestamp
pub const BACKUP_MARKER: &str = ".bak";

/// Default directory name under `$HOME`
pub const BACKUP_DIR_NAME: &str = ".shellbackup";

/// Rotation cap used when none (or zero) is given
pub const DEFAULT_MAX_BACKUPS: usize = 20;

/// Number of newest backups kept uncompressed
pub const DEFAULT_KEEP_RAW: usize = 10;

/// Backup entry information
#[derive(Debug, Clone)]
pub struct BackupEntry {
    pub path: PathBuf,
    pub modified_at: SystemTime,
    pub compressed: bool,
    pub size: u64,
}

impl BackupEntry {
    pub fn file_name(&self) -> String {
        file_name_lossy(&self.path)
    }

    /// Modification time in local time, for listings
    pub fn modified_display(&self) -> String {
        clock::display(self.modified_at)
    }
}

/// Rank thresholds for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    pub max_backups: usize,
    pub keep_raw: usize,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_backups: DEFAULT_MAX_BACKUPS,
            keep_raw: DEFAULT_KEEP_RAW,
        }
    }
}

/// Outcome of one rotation pass.
///
/// A failure on one entry does not stop the pass; it is collected here.
#[derive(Debug, Default)]
pub struct RotationReport {
    /// Entries actually removed
    pub deleted: usize,
    /// Paths produced by compression during this pass
    pub compressed: Vec<PathBuf>,
    pub failures: Vec<Error>,
}

impl RotationReport {
    /// Most recent failure of the pass
    pub fn last_error(&self) -> Option<&Error> {
        self.failures.last()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Backup manager for a single tracked file
pub struct BackupManager {
    tracked: PathBuf,
    preferred_dir: Option<PathBuf>,
    policy: RotationPolicy,
    compressor: Box<dyn Compressor>,
}

impl BackupManager {
    /// Manager with `~/.shellbackup`, xz, and the default rotation policy
    pub fn new(tracked: impl Into<PathBuf>) -> Self {
        Self {
            tracked: tracked.into(),
            preferred_dir: dirs::home_dir().map(|home| home.join(BACKUP_DIR_NAME)),
            policy: RotationPolicy::default(),
            compressor: Box::new(XzCompressor::new()),
        }
    }

    /// Manager configured from the `[backup]` config section
    pub fn from_config(tracked: impl Into<PathBuf>, config: &BackupConfig) -> Self {
        let mut manager = Self::new(tracked)
            .with_compressor(Box::new(XzCompressor::with_program(&config.compressor)))
            .with_policy(RotationPolicy {
                max_backups: config.max_count,
                keep_raw: config.raw_count,
            });
        if let Some(dir) = &config.dir {
            manager.preferred_dir = Some(expand_tilde(dir));
        }
        manager
    }

    /// Prefer `dir` over `~/.shellbackup`
    pub fn with_backup_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.preferred_dir = Some(dir.into());
        self
    }

    pub fn with_compressor(mut self, compressor: Box<dyn Compressor>) -> Self {
        self.compressor = compressor;
        self
    }

    pub fn with_policy(mut self, policy: RotationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn tracked_path(&self) -> &Path {
        &self.tracked
    }

    pub fn policy(&self) -> RotationPolicy {
        self.policy
    }

    /// Resolve the backup directory, creating the preferred one on first use.
    ///
    /// Falls back to the tracked file's own directory when there is no home
    /// directory or the preferred directory cannot be created.
    pub fn backup_dir(&self) -> PathBuf {
        let fallback = parent_or_current(&self.tracked);
        let Some(dir) = &self.preferred_dir else {
            return fallback;
        };
        if dir.is_dir() {
            return dir.clone();
        }

        match create_private_dir(dir) {
            Ok(()) => {
                info!(dir = %dir.display(), "created backup directory");
                dir.clone()
            }
            Err(e) => {
                warn!(
                    dir = %dir.display(),
                    fallback = %fallback.display(),
                    error = %e,
                    "cannot create backup directory, using fallback"
                );
                fallback
            }
        }
    }

    /// `<basename>.bak`, the substring every backup of the tracked file contains
    fn backup_pattern(&self) -> String {
        format!("{}{}", file_name_lossy(&self.tracked), BACKUP_MARKER)
    }

    /// Snapshot the tracked file, then rotate.
    ///
    /// Rotation problems are logged but do not fail the snapshot.
    pub fn create_backup(&self) -> Result<PathBuf> {
        let backup_path = self.copy_to_backup()?;
        self.rotate_logged();
        Ok(backup_path)
    }

    /// Copy the tracked file into the backup directory without rotating
    fn copy_to_backup(&self) -> Result<PathBuf> {
        if !self.tracked.is_file() {
            return Err(Error::file_not_found("Tracked file", &self.tracked));
        }

        let backup_name = format!(
            "{}{}",
            self.backup_pattern(),
            clock::backup_stamp(clock::now())
        );
        let backup_path = self.backup_dir().join(backup_name);

        fs::copy(&self.tracked, &backup_path).map_err(|e| {
            Error::io(
                format!("Failed to create backup {}", backup_path.display()),
                e,
            )
        })?;
        info!(backup = %backup_path.display(), "created backup");
        Ok(backup_path)
    }

    fn rotate_logged(&self) {
        match self.rotate() {
            Ok(report) => {
                for failure in &report.failures {
                    warn!(error = %failure, "backup rotation problem");
                }
            }
            Err(e) => warn!(error = %e, "backup rotation skipped"),
        }
    }

    /// All backups of the tracked file, in directory order
    pub fn list_backups(&self) -> Result<Vec<BackupEntry>> {
        let dir = self.backup_dir();
        let pattern = self.backup_pattern();
        let mut entries = Vec::new();

        let read_dir = fs::read_dir(&dir).map_err(|e| {
            Error::io(format!("Failed to list backups in {}", dir.display()), e)
        })?;

        for entry in read_dir {
            let entry = entry
                .map_err(|e| Error::io(format!("Failed to list backups in {}", dir.display()), e))?;

            let filename = entry.file_name().to_string_lossy().to_string();
            if !filename.contains(&pattern) {
                continue;
            }

            // Entries whose metadata cannot be read are left out of rotation
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            let Ok(modified_at) = metadata.modified() else {
                continue;
            };

            let path = entry.path();
            entries.push(BackupEntry {
                compressed: self.compressor.is_compressed(&path),
                path,
                modified_at,
                size: metadata.len(),
            });
        }

        Ok(entries)
    }

    /// All backups, newest first
    pub fn list_backups_sorted(&self) -> Result<Vec<BackupEntry>> {
        let mut backups = self.list_backups()?;
        sort_newest_first(&mut backups);
        Ok(backups)
    }

    /// Newest backup, if any
    pub fn last_backup(&self) -> Result<Option<BackupEntry>> {
        Ok(self.list_backups_sorted()?.into_iter().next())
    }

    /// Rotate with the configured policy
    pub fn rotate(&self) -> Result<RotationReport> {
        self.cleanup_and_compress_old_backups(self.policy.max_backups)
    }

    /// Compress backups ranked `keep_raw..max_backups` and delete the rest.
    ///
    /// `max_backups == 0` means [`DEFAULT_MAX_BACKUPS`]. Only a failure to
    /// list the directory is returned as an error; per-entry failures are
    /// collected in the report.
    pub fn cleanup_and_compress_old_backups(&self, max_backups: usize) -> Result<RotationReport> {
        let max_backups = if max_backups == 0 {
            DEFAULT_MAX_BACKUPS
        } else {
            max_backups
        };
        let backups = self.list_backups_sorted()?;
        let mut report = RotationReport::default();

        for (rank, backup) in backups.iter().enumerate() {
            if rank >= max_backups {
                match fs::remove_file(&backup.path) {
                    Ok(()) => {
                        debug!(backup = %backup.path.display(), "deleted old backup");
                        report.deleted += 1;
                    }
                    Err(e) => report.failures.push(Error::io(
                        format!("Failed to delete backup {}", backup.path.display()),
                        e,
                    )),
                }
            } else if rank >= self.policy.keep_raw && !backup.compressed {
                match self.compressor.compress(&backup.path) {
                    Ok(path) => {
                        debug!(backup = %path.display(), "compressed backup");
                        report.compressed.push(path);
                    }
                    Err(e) => report.failures.push(e),
                }
            }
        }

        Ok(report)
    }

    /// Copy a backup over the tracked file.
    ///
    /// Compressed backups are decompressed next to themselves, read, and the
    /// decompressed copy removed again; the compressed file is kept.
    pub fn restore_from_backup(&self, backup: &Path) -> Result<()> {
        let content = self.read_backup(backup)?;
        self.write_tracked(&content)?;
        info!(backup = %backup.display(), tracked = %self.tracked.display(), "restored backup");
        Ok(())
    }

    /// Snapshot the current tracked file, then restore `backup` over it.
    ///
    /// The backup is read before the snapshot is taken, so a snapshot that
    /// lands on the same name, or rotation pushing `backup` out, cannot
    /// change what gets restored. Returns the snapshot path, `None` when
    /// there was no tracked file to snapshot.
    pub fn restore_with_snapshot(&self, backup: &Path) -> Result<Option<PathBuf>> {
        let content = self.read_backup(backup)?;
        let snapshot = if self.tracked.is_file() {
            Some(self.copy_to_backup()?)
        } else {
            None
        };

        self.write_tracked(&content)?;
        info!(backup = %backup.display(), tracked = %self.tracked.display(), "restored backup");
        self.rotate_logged();
        Ok(snapshot)
    }

    /// Content of a raw or compressed backup
    fn read_backup(&self, backup: &Path) -> Result<Vec<u8>> {
        if !backup.is_file() {
            return Err(Error::file_not_found("Backup file", backup));
        }
        if !self.compressor.is_compressed(backup) {
            return fs::read(backup).map_err(|e| {
                Error::io(format!("Failed to read backup {}", backup.display()), e)
            });
        }

        let source = self.compressor.decompress(backup)?;
        let content = fs::read(&source)
            .map_err(|e| Error::io(format!("Failed to read backup {}", source.display()), e));

        // Left in place it would be listed and rotated as a backup of its own
        if let Err(e) = fs::remove_file(&source) {
            warn!(path = %source.display(), error = %e, "cannot remove decompressed backup");
        }
        content
    }

    fn write_tracked(&self, content: &[u8]) -> Result<()> {
        fs::write(&self.tracked, content).map_err(|e| {
            Error::io(
                format!("Failed to restore {} from backup", self.tracked.display()),
                e,
            )
        })
    }

    /// Restore the newest backup, returning its path
    pub fn restore_from_last_backup(&self) -> Result<PathBuf> {
        let last = self.last_backup()?.ok_or_else(|| {
            Error::not_found("Backup", format!("no backups of {}", self.tracked.display()))
        })?;
        self.restore_from_backup(&last.path)?;
        Ok(last.path)
    }
}

/// Newest first; equal timestamps fall back to descending path order
pub fn sort_newest_first(entries: &mut [BackupEntry]) {
    entries.sort_by(|a, b| {
        b.modified_at
            .cmp(&a.modified_at)
            .then_with(|| b.path.cmp(&a.path))
    });
}

/// Create `dir` (and parents) readable only by the owner
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}
