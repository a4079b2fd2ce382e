//! Backup store: restorable copies of files taken before they are destroyed.
//!
//! Backups mirror the project-relative path under the backup root, so
//! `src/lib/util.js` is stored at `{backup_root}/src/lib/util.js` and
//! restoring is a pure path rewrite.
//!
//! Only one generation is kept. The first destructive action of an apply run
//! calls [`BackupStore::begin_generation`], which clears whatever the previous
//! apply run left behind; every later backup in the same run overwrites
//! (last write wins).

use crate::error::{Result, SweepError};
use crate::fs::FileSystem;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Result of a restore request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The backup was copied back to this absolute path.
    Restored(PathBuf),
    /// No backup exists for the path.
    Skipped,
}

/// Owner of the backup root directory.
pub struct BackupStore<'a, F: FileSystem> {
    fs: &'a F,
    project_root: PathBuf,
    backup_root: PathBuf,
    generation_started: bool,
}

impl<'a, F: FileSystem> BackupStore<'a, F> {
    pub fn new(fs: &'a F, project_root: impl Into<PathBuf>, backup_root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            project_root: project_root.into(),
            backup_root: backup_root.into(),
            generation_started: false,
        }
    }

    /// Whether this run has started a new backup generation.
    pub fn generation_started(&self) -> bool {
        self.generation_started
    }

    /// Discard the previous generation and create an empty backup root.
    ///
    /// Idempotent within a run. Failing to create the root is structural.
    pub fn begin_generation(&mut self) -> Result<()> {
        if self.generation_started {
            return Ok(());
        }

        if self.fs.exists(&self.backup_root) {
            self.fs.remove_dir_all(&self.backup_root).map_err(|e| {
                SweepError::BackupError(format!(
                    "failed to clear previous backups at '{}': {}",
                    self.backup_root.display(),
                    e
                ))
            })?;
        }

        self.fs.create_dir_all(&self.backup_root).map_err(|e| {
            SweepError::BackupError(format!(
                "failed to create backup root '{}': {}",
                self.backup_root.display(),
                e
            ))
        })?;

        self.generation_started = true;
        Ok(())
    }

    /// Mirrored backup location for a project-relative path.
    pub fn backup_path(&self, relative: &str) -> io::Result<PathBuf> {
        let relative = checked_relative(relative)?;
        Ok(self.backup_root.join(relative))
    }

    /// Copy the project file at `relative` into the backup root.
    ///
    /// Returns the backup destination.
    pub fn backup(&self, relative: &str) -> io::Result<PathBuf> {
        let source = self.project_root.join(checked_relative(relative)?);
        let destination = self.backup_path(relative)?;

        if let Some(parent) = destination.parent() {
            self.fs.create_dir_all(parent)?;
        }
        self.fs.copy(&source, &destination)?;

        Ok(destination)
    }

    /// Copy the backup of `relative` back to its project location.
    pub fn restore(&self, relative: &str) -> io::Result<RestoreOutcome> {
        let backup = self.backup_path(relative)?;
        if !self.fs.is_file(&backup) {
            return Ok(RestoreOutcome::Skipped);
        }

        let original = self.project_root.join(checked_relative(relative)?);
        if let Some(parent) = original.parent() {
            self.fs.create_dir_all(parent)?;
        }
        self.fs.copy(&backup, &original)?;

        Ok(RestoreOutcome::Restored(original))
    }

    /// Whether a backup exists for `relative`.
    pub fn has_backup(&self, relative: &str) -> bool {
        self.backup_path(relative)
            .map(|p| self.fs.is_file(&p))
            .unwrap_or(false)
    }
}

/// Reject paths that would escape the mirrored tree.
fn checked_relative(relative: &str) -> io::Result<&Path> {
    let path = Path::new(relative);
    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });

    if escapes || relative.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("path '{}' is not a project-relative path", relative),
        ));
    }

    Ok(path)
}
