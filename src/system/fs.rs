//! Filesystem writes with explicit permissions.
//!
//! Every file the installer creates goes through [`FileOps`] so that
//! `--dry-run` can log the write instead of performing it, and so the
//! mode of secret-bearing files is set even when the file already existed.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::Path;

/// Mode for files holding secrets.
pub const MODE_SECRET: u32 = 0o600;

/// Mode for world-readable files (payload, unit file).
pub const MODE_PUBLIC: u32 = 0o644;

#[derive(Debug, Clone, Copy, Default)]
pub struct FileOps {
    dry_run: bool,
}

impl FileOps {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Create `path` and its parents. Existing directories are fine.
    pub fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        if self.dry_run {
            tracing::info!(path = %path.display(), "[dry-run] would create directory");
            return Ok(());
        }
        fs::create_dir_all(path)
    }

    /// Write `contents` to `path` (truncating) and force `mode`.
    pub fn write(&self, path: &Path, contents: &str, mode: u32) -> io::Result<()> {
        if self.dry_run {
            tracing::info!(
                path = %path.display(),
                bytes = contents.len(),
                mode = %format!("{:o}", mode),
                "[dry-run] would write file"
            );
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(mode)
            .open(path)?;
        // `mode()` only applies on creation; tighten before any bytes land.
        file.set_permissions(fs::Permissions::from_mode(mode))?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;

        tracing::debug!(path = %path.display(), bytes = contents.len(), "File written");
        Ok(())
    }

    /// Remove a file. Missing files are not an error; returns whether
    /// anything was removed.
    pub fn remove_file(&self, path: &Path) -> io::Result<bool> {
        if !path.exists() {
            return Ok(false);
        }
        if self.dry_run {
            tracing::info!(path = %path.display(), "[dry-run] would remove file");
            return Ok(true);
        }
        fs::remove_file(path)?;
        Ok(true)
    }

    /// Remove a directory tree. Missing directories are not an error.
    pub fn remove_dir_all(&self, path: &Path) -> io::Result<bool> {
        if !path.exists() {
            return Ok(false);
        }
        if self.dry_run {
            tracing::info!(path = %path.display(), "[dry-run] would remove directory");
            return Ok(true);
        }
        fs::remove_dir_all(path)?;
        Ok(true)
    }
}
