//! Operation ledger: the ordered audit trail of one run.
//!
//! Every processed candidate appends exactly one [`Operation`]. Entries are
//! never edited once recorded. After an apply run the applied subset is
//! persisted as a [`RollbackManifest`] at a fixed location so a later process
//! can undo the run. Dry-run ledgers live only in memory.

mod manifest;
mod types;


pub use manifest::{PersistContext, RollbackManifest};
pub use types::{Operation, OperationType, Outcome, RunMode, Summary};

use crate::error::Result;
use std::path::Path;

/// Append-only operation log for one run.
#[derive(Debug, Clone)]
pub struct Ledger {
    mode: RunMode,
    operations: Vec<Operation>,
}

impl Ledger {
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            operations: Vec::new(),
        }
    }

    /// Append an operation.
    pub fn record(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// All operations in the order they were recorded.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Operations with outcome `applied`, in order.
    pub fn applied(&self) -> impl Iterator<Item = &Operation> {
        self.operations
            .iter()
            .filter(|op| op.outcome == Outcome::Applied)
    }

    /// Aggregate counts.
    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            total_operations: self.operations.len(),
            ..Summary::default()
        };

        for op in &self.operations {
            match (op.outcome, op.op_type) {
                (Outcome::Failed, _) => summary.failed += 1,
                (Outcome::Applied, _) if op.already_absent => summary.unchanged += 1,
                (Outcome::Applied, OperationType::RemoveFile) => {
                    summary.files_removed += 1;
                    summary.bytes_freed += op.size;
                }
                (Outcome::Applied, OperationType::RemoveDependency) => {
                    summary.dependencies_removed += 1
                }
                (Outcome::Simulated, OperationType::RemoveFile) => {
                    summary.files_to_remove += 1;
                    summary.bytes_to_free += op.size;
                }
                (Outcome::Simulated, OperationType::RemoveDependency) => {
                    summary.dependencies_to_remove += 1
                }
            }
        }

        summary
    }

    /// Write the rollback manifest for an apply run.
    ///
    /// Returns `None` without touching disk for a dry-run ledger.
    pub fn persist(
        &self,
        manifest_path: &Path,
        context: &PersistContext,
    ) -> Result<Option<RollbackManifest>> {
        if !self.mode.is_apply() {
            return Ok(None);
        }

        let manifest = RollbackManifest::from_ledger(self, context);
        manifest.save(manifest_path)?;
        Ok(Some(manifest))
    }
}
