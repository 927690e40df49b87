//! Compression backends for rotated backups
//!
//! Backups past the newest few are compressed in place. [`XzCompressor`]
//! runs the external `xz` program; [`FakeCompressor`] only renames files and
//! exists so rotation can be exercised without `xz` installed.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{Error, Result};
use crate::utils::path::{file_name_lossy, with_suffix};

/// Suffix carried by compressed backups
pub const COMPRESSED_SUFFIX: &str = ".xz";

/// In-place compression of a single file
pub trait Compressor {
    /// Suffix appended by [`compress`](Self::compress)
    fn suffix(&self) -> &'static str {
        COMPRESSED_SUFFIX
    }

    /// Replace `path` with `<path><suffix>`, returning the new path
    fn compress(&self, path: &Path) -> Result<PathBuf>;

    /// Write the uncompressed sibling of `path` (overwriting it if present)
    /// and return its path. The compressed file is kept.
    fn decompress(&self, path: &Path) -> Result<PathBuf>;

    /// Path `compress` produces for `path`
    fn compressed_path(&self, path: &Path) -> PathBuf {
        with_suffix(path, self.suffix())
    }

    /// Path `decompress` produces for `path`, if it carries the suffix
    fn decompressed_path(&self, path: &Path) -> Option<PathBuf> {
        let name = file_name_lossy(path);
        name.strip_suffix(self.suffix())
            .filter(|stem| !stem.is_empty())
            .map(|stem| path.with_file_name(stem))
    }

    /// True if `path` carries the compressed suffix
    fn is_compressed(&self, path: &Path) -> bool {
        self.decompressed_path(path).is_some()
    }
}

/// Compressor backed by the `xz` command line tool.
///
/// Paths are passed as separate arguments, never through a shell.
#[derive(Debug, Clone)]
pub struct XzCompressor {
    program: String,
}

impl Default for XzCompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl XzCompressor {
    pub fn new() -> Self {
        Self::with_program("xz")
    }

    /// Use a different xz-compatible executable
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, args: &[&str], path: &Path) -> Result<()> {
        debug!(program = %self.program, ?args, path = %path.display(), "running compressor");

        let status = Command::new(&self.program)
            .args(args)
            .arg(path)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| Error::compression(path, format!("cannot run {}: {}", self.program, e)))?;

        if !status.success() {
            return Err(Error::compression(
                path,
                format!("{} exited with {}", self.program, status),
            ));
        }
        Ok(())
    }
}

impl Compressor for XzCompressor {
    fn compress(&self, path: &Path) -> Result<PathBuf> {
        self.run(&["-9e"], path)?;
        Ok(self.compressed_path(path))
    }

    fn decompress(&self, path: &Path) -> Result<PathBuf> {
        let output = self
            .decompressed_path(path)
            .ok_or_else(|| Error::compression(path, "not a compressed backup"))?;
        self.run(&["-d", "-k", "-f"], path)?;
        Ok(output)
    }
}

/// Test double that "compresses" by renaming and "decompresses" by copying.
///
/// Modification times are carried over the way `xz` does, so rotation order
/// is unaffected. Either direction can be told to fail.
#[derive(Debug, Clone, Default)]
pub struct FakeCompressor {
    fail_compress: bool,
    fail_decompress: bool,
}

impl FakeCompressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `compress` call fails
    pub fn failing_compress() -> Self {
        Self {
            fail_compress: true,
            ..Self::default()
        }
    }

    /// Every `decompress` call fails
    pub fn failing_decompress() -> Self {
        Self {
            fail_decompress: true,
            ..Self::default()
        }
    }
}

impl Compressor for FakeCompressor {
    fn compress(&self, path: &Path) -> Result<PathBuf> {
        if self.fail_compress {
            return Err(Error::compression(path, "simulated failure"));
        }
        let target = self.compressed_path(path);
        fs::rename(path, &target).map_err(|e| Error::compression(path, e.to_string()))?;
        Ok(target)
    }

    fn decompress(&self, path: &Path) -> Result<PathBuf> {
        if self.fail_decompress {
            return Err(Error::compression(path, "simulated failure"));
        }
        let target = self
            .decompressed_path(path)
            .ok_or_else(|| Error::compression(path, "not a compressed backup"))?;

        fs::copy(path, &target).map_err(|e| Error::compression(path, e.to_string()))?;
        fs::metadata(path)
            .and_then(|m| m.modified())
            .and_then(|modified| {
                fs::File::options()
                    .write(true)
                    .open(&target)?
                    .set_modified(modified)
            })
            .map_err(|e| Error::compression(path, format!("cannot carry over mtime: {}", e)))?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_suffix_paths() {
        let xz = XzCompressor::new();
        let raw = Path::new("/b/.bashrc.bak20240101_000000");
        let packed = Path::new("/b/.bashrc.bak20240101_000000.xz");

        assert_eq!(xz.compressed_path(raw), packed);
        assert_eq!(xz.decompressed_path(packed).as_deref(), Some(raw));
        assert!(xz.is_compressed(packed));
        assert!(!xz.is_compressed(raw));
        assert!(!xz.is_compressed(Path::new("/b/.xz")));
    }

    #[test]
    fn test_missing_program_is_compression_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("f.bak1");
        fs::write(&file, "x").unwrap();

        let xz = XzCompressor::with_program("definitely-not-a-real-xz-binary");
        let err = xz.compress(&file).unwrap_err();
        assert!(matches!(err, Error::Compression { .. }));
        assert!(file.exists());
    }

    #[test]
    fn test_fake_round_trip_keeps_source() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("f.bak1");
        fs::write(&file, "alias ll='ls'\n").unwrap();

        let fake = FakeCompressor::new();
        let packed = fake.compress(&file).unwrap();
        assert!(!file.exists());
        assert!(packed.exists());

        let unpacked = fake.decompress(&packed).unwrap();
        assert_eq!(unpacked, file);
        assert!(packed.exists());
        assert_eq!(fs::read_to_string(&unpacked).unwrap(), "alias ll='ls'\n");
    }

    #[test]
    fn test_fake_decompress_carries_mtime() {
        let dir = tempdir().unwrap();
        let packed = dir.path().join("f.bak1.xz");
        fs::write(&packed, "x").unwrap();
        let old = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(86_400);
        fs::File::options()
            .write(true)
            .open(&packed)
            .unwrap()
            .set_modified(old)
            .unwrap();

        let unpacked = FakeCompressor::new().decompress(&packed).unwrap();
        assert_eq!(fs::metadata(&unpacked).unwrap().modified().unwrap(), old);
    }

    #[test]
    fn test_fake_failures() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("f.bak1");
        fs::write(&file, "x").unwrap();

        assert!(FakeCompressor::failing_compress().compress(&file).is_err());
        assert!(file.exists());

        let packed = FakeCompressor::new().compress(&file).unwrap();
        assert!(FakeCompressor::failing_decompress()
            .decompress(&packed)
            .is_err());
    }
}
