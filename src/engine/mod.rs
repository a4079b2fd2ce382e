//! Removal engine: turns a candidate batch into recorded operations.
//!
//! Categories are processed in a fixed order (dead, orphaned, duplicate,
//! dependency) and candidates within a category strictly in list order. Each
//! candidate goes through the same gate:
//!
//! - decide (pure, see [`decision`]) from the mode and a probe of the target
//! - dry run: record `simulated`, touch nothing
//! - apply: back up, then delete or rewrite, then record `applied` or `failed`
//!
//! A failure on one candidate is recorded and the batch continues. Only an
//! unreadable dependency manifest (checked before anything is touched) or an
//! uncreatable backup root aborts the run. After an apply run that started a
//! backup generation, the ledger is persisted as the rollback manifest.

pub mod decision;
mod dependencies;
mod files;

#[cfg(test)]
mod tests;

use crate::backup::BackupStore;
use crate::candidates::{CandidateSet, Category};
use crate::config::Config;
use crate::context::ProjectContext;
use crate::error::Result;
use crate::fs::FileSystem;
use crate::ledger::{Ledger, Operation, PersistContext, RunMode, Summary};
use globset::GlobSet;
use serde::Serialize;
use std::path::PathBuf;

/// Everything the engine needs to know about the project.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub project_root: PathBuf,
    pub backup_root: PathBuf,
    pub rollback_manifest_path: PathBuf,
    /// Project-relative path of the dependency manifest.
    pub dependency_manifest: String,
    pub protected: GlobSet,
    /// Revision captured at apply time; stored in the rollback manifest.
    pub vcs_revision: Option<String>,
}

impl EngineSettings {
    pub fn new(ctx: &ProjectContext, config: &Config) -> Result<Self> {
        Ok(Self {
            project_root: ctx.project_root.clone(),
            backup_root: ctx.backup_root.clone(),
            rollback_manifest_path: ctx.rollback_manifest_path(),
            dependency_manifest: config.dependency_manifest.clone(),
            protected: config.protected_globs()?,
            vcs_revision: None,
        })
    }

    pub fn with_vcs_revision(mut self, revision: Option<String>) -> Self {
        self.vcs_revision = revision;
        self
    }
}

/// A candidate that produced no operation because its target was gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedCandidate {
    pub path: String,
    pub category: Category,
    pub reason: String,
}

/// Result of one engine run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub mode: RunMode,
    pub operations: Vec<Operation>,
    pub summary: Summary,
    pub skipped: Vec<SkippedCandidate>,
    /// Where the rollback manifest was written, if it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollback_manifest: Option<PathBuf>,
}

impl RunReport {
    pub fn is_dry_run(&self) -> bool {
        !self.mode.is_apply()
    }
}

/// Per-run engine state. Construct one per run; nothing is shared between runs.
pub struct RemovalEngine<'a, F: FileSystem> {
    fs: &'a F,
    settings: EngineSettings,
    mode: RunMode,
    ledger: Ledger,
    backups: BackupStore<'a, F>,
    skipped: Vec<SkippedCandidate>,
    manifest_backed_up: bool,
}

impl<'a, F: FileSystem> RemovalEngine<'a, F> {
    pub fn new(fs: &'a F, settings: EngineSettings, mode: RunMode) -> Self {
        let backups = BackupStore::new(fs, &settings.project_root, &settings.backup_root);
        Self {
            fs,
            settings,
            mode,
            ledger: Ledger::new(mode),
            backups,
            skipped: Vec::new(),
            manifest_backed_up: false,
        }
    }

    /// Process the whole batch and, for apply runs, persist the rollback manifest.
    pub fn run(mut self, candidates: &CandidateSet) -> Result<RunReport> {
        let dependencies: Vec<_> = candidates.of_category(Category::UnusedDependency).collect();

        // Read up front: a broken manifest must abort before any file is removed.
        let manifest = if dependencies.is_empty() {
            None
        } else {
            Some(self.read_manifest()?)
        };

        for category in [
            Category::DeadFile,
            Category::OrphanedFile,
            Category::DuplicateFile,
        ] {
            for candidate in candidates.of_category(category) {
                self.process_file(candidate)?;
            }
        }

        if let Some(manifest) = manifest {
            self.process_dependencies(&dependencies, manifest)?;
        }

        let rollback_manifest = self.persist()?;

        Ok(RunReport {
            mode: self.mode,
            summary: self.ledger.summary(),
            operations: self.ledger.operations().to_vec(),
            skipped: self.skipped,
            rollback_manifest,
        })
    }

    /// Persist the ledger when this apply run started a backup generation.
    ///
    /// Manifest and backup root therefore always describe the same run.
    fn persist(&self) -> Result<Option<PathBuf>> {
        if !self.mode.is_apply() || !self.backups.generation_started() {
            return Ok(None);
        }

        let context = PersistContext {
            project_root: self.settings.project_root.clone(),
            vcs_revision: self.settings.vcs_revision.clone(),
            dependency_manifest: self
                .manifest_backed_up
                .then(|| self.settings.dependency_manifest.clone()),
        };

        let path = &self.settings.rollback_manifest_path;
        Ok(self.ledger.persist(path, &context)?.map(|_| path.clone()))
    }
}
