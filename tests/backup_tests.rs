//! Backup rotation and restore against a real directory

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use rcalias::backup::{BackupManager, FakeCompressor, RotationPolicy};
use tempfile::{tempdir, TempDir};

struct Fixture {
    _dir: TempDir,
    tracked: PathBuf,
    backups: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let tracked = dir.path().join(".bashrc");
        fs::write(&tracked, "alias ll='ls -la'\n").unwrap();
        let backups = dir.path().join("backups");
        fs::create_dir(&backups).unwrap();
        Self {
            _dir: dir,
            tracked,
            backups,
        }
    }

    fn manager(&self, compressor: FakeCompressor) -> BackupManager {
        BackupManager::new(&self.tracked)
            .with_backup_dir(&self.backups)
            .with_compressor(Box::new(compressor))
    }

    /// Backup `i` is `i` minutes older than backup 0
    fn seed(&self, count: usize) -> Vec<PathBuf> {
        let base = SystemTime::now() - Duration::from_secs(24 * 3600);
        (0..count)
            .map(|i| {
                let path = self
                    .backups
                    .join(format!(".bashrc.bak20240101_{:06}", 100 - i));
                fs::write(&path, format!("backup {i}\n")).unwrap();
                set_mtime(&path, base - Duration::from_secs(60 * i as u64));
                path
            })
            .collect()
    }
}

fn set_mtime(path: &Path, when: SystemTime) {
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(when)
        .unwrap();
}

fn xz(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".xz");
    PathBuf::from(name)
}

#[test]
fn test_rotation_ranks() {
    let fx = Fixture::new();
    let seeded = fx.seed(25);
    let manager = fx.manager(FakeCompressor::new());

    let report = manager.cleanup_and_compress_old_backups(20).unwrap();
    assert!(report.is_clean(), "{:?}", report.failures);
    assert_eq!(report.deleted, 5);
    assert_eq!(report.compressed.len(), 10);

    for (rank, path) in seeded.iter().enumerate() {
        match rank {
            0..=9 => {
                assert!(path.exists(), "rank {rank} should stay raw");
                assert!(!xz(path).exists());
            }
            10..=19 => {
                assert!(!path.exists(), "rank {rank} should be compressed");
                assert!(xz(path).exists());
            }
            _ => {
                assert!(!path.exists(), "rank {rank} should be deleted");
                assert!(!xz(path).exists());
            }
        }
    }

    assert_eq!(manager.list_backups().unwrap().len(), 20);
}

#[test]
fn test_rotation_is_stable_on_second_pass() {
    let fx = Fixture::new();
    fx.seed(25);
    let manager = fx.manager(FakeCompressor::new());

    manager.cleanup_and_compress_old_backups(20).unwrap();
    let again = manager.cleanup_and_compress_old_backups(20).unwrap();

    assert_eq!(again.deleted, 0);
    assert!(again.compressed.is_empty());
    assert!(again.is_clean());
}

#[test]
fn test_zero_max_means_default() {
    let fx = Fixture::new();
    fx.seed(22);
    let manager = fx.manager(FakeCompressor::new());

    let report = manager.cleanup_and_compress_old_backups(0).unwrap();
    assert_eq!(report.deleted, 2);
    assert_eq!(manager.list_backups().unwrap().len(), 20);
}

#[test]
fn test_compression_failure_does_not_stop_rotation() {
    let fx = Fixture::new();
    let seeded = fx.seed(25);
    let manager = fx.manager(FakeCompressor::failing_compress());

    let report = manager.cleanup_and_compress_old_backups(20).unwrap();
    assert_eq!(report.deleted, 5);
    assert_eq!(report.failures.len(), 10);
    assert!(report.last_error().is_some());

    // Failed entries stay raw; the overflow is still removed
    assert!(seeded[10..20].iter().all(|p| p.exists()));
    assert!(seeded[20..].iter().all(|p| !p.exists()));
}

#[test]
fn test_custom_policy() {
    let fx = Fixture::new();
    let seeded = fx.seed(6);
    let manager = fx.manager(FakeCompressor::new()).with_policy(RotationPolicy {
        max_backups: 4,
        keep_raw: 2,
    });

    let report = manager.rotate().unwrap();
    assert_eq!(report.deleted, 2);
    assert_eq!(report.compressed.len(), 2);
    assert!(seeded[1].exists());
    assert!(xz(&seeded[2]).exists());
    assert!(!seeded[5].exists());
}

#[test]
fn test_create_backup_rotates() {
    let fx = Fixture::new();
    fx.seed(20);
    let manager = fx.manager(FakeCompressor::new());

    let created = manager.create_backup().unwrap();
    assert!(created.exists());

    let backups = manager.list_backups_sorted().unwrap();
    assert_eq!(backups.len(), 20);
    assert_eq!(backups[0].path, created);
    assert_eq!(backups.iter().filter(|b| b.compressed).count(), 10);
}

#[test]
fn test_restore_is_idempotent() {
    let fx = Fixture::new();
    let manager = fx.manager(FakeCompressor::new());
    let backup = manager.create_backup().unwrap();

    fs::write(&fx.tracked, "alias broken=\n").unwrap();
    manager.restore_from_backup(&backup).unwrap();
    let first = fs::read(&fx.tracked).unwrap();
    manager.restore_from_backup(&backup).unwrap();

    assert_eq!(fs::read(&fx.tracked).unwrap(), first);
    assert_eq!(first, b"alias ll='ls -la'\n");
    assert!(backup.exists());
}

#[test]
fn test_restore_compressed_keeps_archive() {
    let fx = Fixture::new();
    let seeded = fx.seed(12);
    let manager = fx.manager(FakeCompressor::new());
    manager.rotate().unwrap();

    let archive = xz(&seeded[11]);
    assert!(archive.exists());

    manager.restore_from_backup(&archive).unwrap();
    assert_eq!(fs::read_to_string(&fx.tracked).unwrap(), "backup 11\n");
    assert!(archive.exists());
    // The decompressed copy is not left behind as an extra backup
    assert!(!seeded[11].exists());
    assert_eq!(manager.list_backups().unwrap().len(), 12);
}

#[test]
fn test_rotation_after_compressed_restore_is_clean() {
    let fx = Fixture::new();
    let seeded = fx.seed(12);
    let manager = fx.manager(FakeCompressor::new());
    manager.rotate().unwrap();

    manager.restore_from_backup(&xz(&seeded[11])).unwrap();
    let report = manager.rotate().unwrap();

    assert!(report.is_clean(), "{:?}", report.failures);
    assert!(report.compressed.is_empty());
    assert_eq!(report.deleted, 0);
    assert_eq!(manager.list_backups().unwrap().len(), 12);
}

#[test]
fn test_restore_with_snapshot_keeps_current_state() {
    let fx = Fixture::new();
    let manager = fx.manager(FakeCompressor::new());
    let backup = manager.create_backup().unwrap();

    fs::write(&fx.tracked, "alias current='true'\n").unwrap();
    let snapshot = manager.restore_with_snapshot(&backup).unwrap().unwrap();

    assert_eq!(fs::read_to_string(&fx.tracked).unwrap(), "alias ll='ls -la'\n");
    // Same-second snapshots share the backup's name; the state is kept either way
    assert_eq!(
        fs::read_to_string(&snapshot).unwrap(),
        "alias current='true'\n"
    );
}

#[test]
fn test_restore_with_snapshot_without_tracked_file() {
    let fx = Fixture::new();
    let seeded = fx.seed(1);
    fs::remove_file(&fx.tracked).unwrap();
    let manager = fx.manager(FakeCompressor::new());

    assert!(manager.restore_with_snapshot(&seeded[0]).unwrap().is_none());
    assert_eq!(fs::read_to_string(&fx.tracked).unwrap(), "backup 0\n");
}

#[cfg(unix)]
#[test]
fn test_failed_deletions_are_not_counted() {
    use std::os::unix::fs::PermissionsExt;

    let fx = Fixture::new();
    let seeded = fx.seed(25);
    // Nothing to compress, so only the deletions touch the directory
    let manager = fx.manager(FakeCompressor::new()).with_policy(RotationPolicy {
        max_backups: 20,
        keep_raw: 20,
    });

    fs::set_permissions(&fx.backups, fs::Permissions::from_mode(0o500)).unwrap();
    if fs::write(fx.backups.join("writable"), "").is_ok() {
        // Permissions are not enforced for this user (root)
        fs::set_permissions(&fx.backups, fs::Permissions::from_mode(0o700)).unwrap();
        return;
    }

    let report = manager.rotate();
    fs::set_permissions(&fx.backups, fs::Permissions::from_mode(0o700)).unwrap();
    let report = report.unwrap();

    assert_eq!(report.deleted, 0);
    assert_eq!(report.failures.len(), 5);
    assert!(seeded[20..].iter().all(|p| p.exists()));
}

#[test]
fn test_restore_compressed_failure_leaves_file() {
    let fx = Fixture::new();
    let seeded = fx.seed(11);
    fx.manager(FakeCompressor::new()).rotate().unwrap();

    let manager = fx.manager(FakeCompressor::failing_decompress());
    assert!(manager.restore_from_backup(&xz(&seeded[10])).is_err());
    assert_eq!(fs::read_to_string(&fx.tracked).unwrap(), "alias ll='ls -la'\n");
}

#[test]
fn test_restore_from_last_backup_picks_newest() {
    let fx = Fixture::new();
    let seeded = fx.seed(3);
    let manager = fx.manager(FakeCompressor::new());

    let restored = manager.restore_from_last_backup().unwrap();
    assert_eq!(restored, seeded[0]);
    assert_eq!(fs::read_to_string(&fx.tracked).unwrap(), "backup 0\n");
}
