//! Rollback engine: undo the latest apply run.
//!
//! Reads the persisted rollback manifest and copies every backed-up file back
//! to its original location, in the order the files were removed. If the run
//! removed any dependency, the dependency manifest is restored wholesale from
//! its backup. A file that cannot be restored is reported and the rest are
//! still attempted; only a missing or corrupt rollback manifest fails the run.
//!
//! Rollback never touches source control. The revision captured at apply time
//! is handed back in the report for the operator.


use crate::backup::{BackupStore, RestoreOutcome};
use crate::config::Config;
use crate::context::ProjectContext;
use crate::error::Result;
use crate::fs::FileSystem;
use crate::ledger::RollbackManifest;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// What happened to one restore target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreStatus {
    Restored,
    /// No backup was found; nothing was written.
    Skipped,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreEntry {
    /// Project-relative path.
    pub path: String,
    pub status: RestoreStatus,
    pub message: Option<String>,
}

impl RestoreEntry {
    fn from_result(path: &str, result: std::io::Result<RestoreOutcome>) -> Self {
        let (status, message) = match result {
            Ok(RestoreOutcome::Restored(_)) => (RestoreStatus::Restored, None),
            Ok(RestoreOutcome::Skipped) => (
                RestoreStatus::Skipped,
                Some(format!("no backup found for '{}'", path)),
            ),
            Err(e) => (
                RestoreStatus::Failed,
                Some(format!("failed to restore '{}': {}", path, e)),
            ),
        };

        Self {
            path: path.to_string(),
            status,
            message,
        }
    }
}

/// Outcome of a rollback run.
#[derive(Debug, Clone)]
pub struct RollbackReport {
    /// When the undone apply run completed.
    pub applied_at: DateTime<Utc>,
    pub vcs_revision: Option<String>,
    /// Project root recorded in the manifest.
    pub recorded_root: PathBuf,
    /// Project root the backups were looked up under.
    pub current_root: PathBuf,
    /// One entry per `remove_file` operation, in manifest order.
    pub files: Vec<RestoreEntry>,
    /// Present when the manifest held `remove_dependency` operations.
    pub dependency_manifest: Option<RestoreEntry>,
}

impl RollbackReport {
    pub fn root_mismatch(&self) -> bool {
        self.recorded_root != self.current_root
    }

    /// File entries followed by the dependency manifest entry.
    pub fn entries(&self) -> impl Iterator<Item = &RestoreEntry> {
        self.files.iter().chain(self.dependency_manifest.as_ref())
    }

    pub fn count(&self, status: RestoreStatus) -> usize {
        self.entries().filter(|e| e.status == status).count()
    }

    pub fn has_failures(&self) -> bool {
        self.count(RestoreStatus::Failed) > 0
    }
}

pub struct RollbackEngine<'a, F: FileSystem> {
    backups: BackupStore<'a, F>,
    project_root: PathBuf,
    manifest_path: PathBuf,
    /// Used when the rollback manifest predates the `dependencyManifest` field.
    fallback_dependency_manifest: String,
}

impl<'a, F: FileSystem> RollbackEngine<'a, F> {
    pub fn new(fs: &'a F, ctx: &ProjectContext, config: &Config) -> Self {
        Self {
            backups: BackupStore::new(fs, &ctx.project_root, &ctx.backup_root),
            project_root: ctx.project_root.clone(),
            manifest_path: ctx.rollback_manifest_path(),
            fallback_dependency_manifest: config.dependency_manifest.clone(),
        }
    }

    /// Load the rollback manifest and restore everything it lists.
    pub fn run(&self) -> Result<RollbackReport> {
        let manifest = RollbackManifest::load(&self.manifest_path)?;
        Ok(self.restore(&manifest))
    }

    /// Restore the operations of an already loaded manifest.
    pub fn restore(&self, manifest: &RollbackManifest) -> RollbackReport {
        let files = manifest
            .file_operations()
            .map(|op| RestoreEntry::from_result(&op.target, self.backups.restore(&op.target)))
            .collect();

        let dependency_manifest = if manifest.dependency_operations().next().is_some() {
            let relative = manifest
                .dependency_manifest
                .as_deref()
                .unwrap_or(&self.fallback_dependency_manifest);
            Some(RestoreEntry::from_result(
                relative,
                self.backups.restore(relative),
            ))
        } else {
            None
        };

        RollbackReport {
            applied_at: manifest.timestamp,
            vcs_revision: manifest.vcs_revision.clone(),
            recorded_root: manifest.project_root.clone(),
            current_root: self.project_root.clone(),
            files,
            dependency_manifest,
        }
    }
}
