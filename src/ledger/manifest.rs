//! Rollback manifest persistence.

use super::{Ledger, Operation, OperationType};
use crate::error::{Result, SweepError};
use crate::fs::atomic_write;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Run-level values stored next to the applied operations.
#[derive(Debug, Clone)]
pub struct PersistContext {
    pub project_root: PathBuf,
    pub vcs_revision: Option<String>,
    /// Project-relative dependency manifest that was backed up, if any.
    pub dependency_manifest: Option<String>,
}

/// Persisted snapshot of an apply run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackManifest {
    /// When the apply run completed.
    pub timestamp: DateTime<Utc>,
    /// Applied operations only, in execution order.
    pub operations: Vec<Operation>,
    pub project_root: PathBuf,
    /// Informational only; rollback never touches source control.
    #[serde(default)]
    pub vcs_revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_manifest: Option<String>,
}

impl RollbackManifest {
    pub fn from_ledger(ledger: &Ledger, context: &PersistContext) -> Self {
        Self {
            timestamp: Utc::now(),
            operations: ledger.applied().cloned().collect(),
            project_root: context.project_root.clone(),
            vcs_revision: context.vcs_revision.clone(),
            dependency_manifest: context.dependency_manifest.clone(),
        }
    }

    /// Load a manifest written by a previous apply run.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SweepError::RollbackError(format!(
                "no rollback manifest found at '{}'\n\nRun `sweep run --apply` first.",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            SweepError::RollbackError(format!(
                "failed to read rollback manifest '{}': {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            SweepError::RollbackError(format!(
                "rollback manifest '{}' is corrupt: {}",
                path.display(),
                e
            ))
        })
    }

    /// Atomically write the manifest as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            SweepError::BackupError(format!("failed to serialize rollback manifest: {}", e))
        })?;

        atomic_write(path, format!("{}\n", json).as_bytes()).map_err(|e| {
            SweepError::BackupError(format!(
                "failed to write rollback manifest '{}': {}",
                path.display(),
                e
            ))
        })
    }

    pub fn file_operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(|op| op.is_file_removal())
    }

    /// Dependency removals that actually edited the manifest.
    pub fn dependency_operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations
            .iter()
            .filter(|op| op.op_type == OperationType::RemoveDependency && op.changes_project())
    }
}
