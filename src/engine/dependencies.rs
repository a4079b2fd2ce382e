//! Unused dependency candidates.
//!
//! The manifest is read once per batch, before any file candidate is
//! touched, and edited in memory. After every dependency candidate has been
//! evaluated the manifest is backed up once and rewritten atomically, and
//! only then are the dependency operations recorded with their final outcome.
//! A batch whose keys are all already absent writes nothing and leaves the
//! previous backup generation alone.

use super::RemovalEngine;
use super::decision::{locate_dependency, remove_dependency};
use crate::candidates::{CandidateKind, RemovalCandidate};
use crate::error::{Result, SweepError};
use crate::fs::FileSystem;
use crate::ledger::Operation;
use serde_json::Value;

impl<F: FileSystem> RemovalEngine<'_, F> {
    pub(super) fn process_dependencies(
        &mut self,
        candidates: &[&RemovalCandidate],
        mut manifest: Value,
    ) -> Result<()> {
        if !self.mode.is_apply() {
            for candidate in candidates {
                self.ledger.record(Operation::simulated(candidate, 0));
            }
            return Ok(());
        }

        // (candidate, whether this candidate removed a key)
        let mut pending = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let CandidateKind::UnusedDependency { group } = &candidate.kind else {
                continue;
            };
            let group = *group;
            let removed = match locate_dependency(&manifest, &candidate.path, group) {
                Some(found) => remove_dependency(&mut manifest, &candidate.path, found),
                // Already absent: the desired end state holds.
                None => false,
            };
            pending.push((*candidate, removed));
        }

        let dirty = pending.iter().any(|(_, removed)| *removed);
        let write_error = if dirty {
            self.backups.begin_generation()?;
            self.write_manifest(&manifest).err()
        } else {
            None
        };

        for (candidate, removed) in pending {
            let operation = match (&write_error, removed) {
                (Some(message), true) => Operation::failed(candidate, 0, message.clone()),
                (None, true) => Operation::applied(candidate, 0),
                (_, false) => Operation::already_absent(candidate),
            };
            self.ledger.record(operation);
        }

        Ok(())
    }

    pub(super) fn read_manifest(&self) -> Result<Value> {
        let path = self
            .settings
            .project_root
            .join(&self.settings.dependency_manifest);

        let bytes = self.fs.read(&path).map_err(|e| {
            SweepError::ManifestError(format!(
                "failed to read dependency manifest '{}': {}",
                path.display(),
                e
            ))
        })?;

        let manifest: Value = serde_json::from_slice(&bytes).map_err(|e| {
            SweepError::ManifestError(format!(
                "failed to parse dependency manifest '{}': {}",
                path.display(),
                e
            ))
        })?;

        if !manifest.is_object() {
            return Err(SweepError::ManifestError(format!(
                "dependency manifest '{}' is not a JSON object",
                path.display()
            )));
        }

        Ok(manifest)
    }

    /// Back up the manifest, then replace it. Both failures are per-operation.
    fn write_manifest(&mut self, manifest: &Value) -> std::result::Result<(), String> {
        let relative = self.settings.dependency_manifest.clone();

        self.backups
            .backup(&relative)
            .map_err(|e| format!("failed to back up '{}', manifest left unchanged: {}", relative, e))?;
        self.manifest_backed_up = true;

        let mut content = serde_json::to_string_pretty(manifest)
            .map_err(|e| format!("failed to serialize '{}': {}", relative, e))?;
        content.push('\n');

        let path = self.settings.project_root.join(&relative);
        self.fs
            .write_atomic(&path, content.as_bytes())
            .map_err(|e| format!("failed to rewrite '{}': {}", relative, e))
    }
}
