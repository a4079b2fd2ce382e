//! File candidates: dead, orphaned, and duplicate files.

use super::decision::{FileDecision, FileProbe, decide_file, refusal_reason};
use super::{RemovalEngine, SkippedCandidate};
use crate::candidates::{CandidateKind, RemovalCandidate};
use crate::error::Result;
use crate::fs::FileSystem;
use crate::ledger::Operation;
use std::path::Path;

impl<F: FileSystem> RemovalEngine<'_, F> {
    pub(super) fn process_file(&mut self, candidate: &RemovalCandidate) -> Result<()> {
        if let Some(message) = refusal_reason(&candidate.path, &self.settings.protected) {
            self.ledger
                .record(Operation::failed(candidate, candidate.size, message));
            return Ok(());
        }

        let target = self.settings.project_root.join(&candidate.path);
        let probe = self.probe(&target);
        let original_present = match &candidate.kind {
            CandidateKind::DuplicateFile { original } => {
                self.fs.is_file(&self.settings.project_root.join(original))
            }
            _ => true,
        };

        match decide_file(candidate, self.mode, probe, original_present) {
            FileDecision::Skip { reason } => {
                self.skipped.push(SkippedCandidate {
                    path: candidate.path.clone(),
                    category: candidate.category(),
                    reason,
                });
            }
            FileDecision::Refuse { message } => {
                self.ledger
                    .record(Operation::failed(candidate, candidate.size, message));
            }
            FileDecision::Simulate { size } => {
                self.ledger.record(Operation::simulated(candidate, size));
            }
            FileDecision::Remove { size } => {
                self.backups.begin_generation()?;
                let operation = match self.backup_then_delete(&candidate.path, &target) {
                    Ok(()) => Operation::applied(candidate, size),
                    Err(message) => Operation::failed(candidate, size, message),
                };
                self.ledger.record(operation);
            }
        }

        Ok(())
    }

    fn probe(&self, target: &Path) -> FileProbe {
        if !self.fs.exists(target) {
            return FileProbe::Missing;
        }
        if !self.fs.is_file(target) {
            return FileProbe::NotAFile;
        }
        match self.fs.file_len(target) {
            Ok(len) => FileProbe::Present { len },
            // Vanished between the two calls.
            Err(_) => FileProbe::Missing,
        }
    }

    /// Copy to the backup root, verify the copy, then delete.
    ///
    /// Nothing is deleted unless the backup is confirmed.
    fn backup_then_delete(&self, relative: &str, target: &Path) -> std::result::Result<(), String> {
        let backup = self
            .backups
            .backup(relative)
            .map_err(|e| format!("backup failed, file left in place: {}", e))?;

        let original_len = self
            .fs
            .file_len(target)
            .map_err(|e| format!("failed to stat '{}' after backup: {}", relative, e))?;
        let backup_len = self
            .fs
            .file_len(&backup)
            .map_err(|e| format!("backup verification failed, file left in place: {}", e))?;
        if original_len != backup_len {
            return Err(format!(
                "backup verification failed, file left in place: expected {} bytes, backup has {}",
                original_len, backup_len
            ));
        }

        self.fs
            .remove_file(target)
            .map_err(|e| format!("failed to remove '{}': {}", relative, e))
    }
}
