//! Operation records.

use crate::candidates::RemovalCandidate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a run touches the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Report what would happen; no side effects.
    #[default]
    DryRun,
    /// Back up, delete, and rewrite.
    Apply,
}

impl RunMode {
    pub fn from_apply_flag(apply: bool) -> Self {
        if apply { RunMode::Apply } else { RunMode::DryRun }
    }

    pub fn is_apply(&self) -> bool {
        matches!(self, RunMode::Apply)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    RemoveFile,
    RemoveDependency,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationType::RemoveFile => write!(f, "remove_file"),
            OperationType::RemoveDependency => write!(f, "remove_dependency"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Simulated,
    Applied,
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Simulated => write!(f, "simulated"),
            Outcome::Applied => write!(f, "applied"),
            Outcome::Failed => write!(f, "failed"),
        }
    }
}

/// One executed or simulated action.
///
/// `error_message` is set exactly when `outcome` is [`Outcome::Failed`]; the
/// constructors are the only way the engine builds operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(rename = "type")]
    pub op_type: OperationType,
    pub target: String,
    pub reason: String,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_path: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Applied dependency removal whose key was already gone; nothing changed.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub already_absent: bool,
}

impl Operation {
    fn from_candidate(candidate: &RemovalCandidate, size: u64, outcome: Outcome) -> Self {
        let op_type = if candidate.is_file() {
            OperationType::RemoveFile
        } else {
            OperationType::RemoveDependency
        };

        Self {
            op_type,
            target: candidate.path.clone(),
            reason: candidate.reason.clone(),
            size,
            related_path: candidate.related_path(),
            timestamp: Utc::now(),
            outcome,
            error_message: None,
            already_absent: false,
        }
    }

    pub fn simulated(candidate: &RemovalCandidate, size: u64) -> Self {
        Self::from_candidate(candidate, size, Outcome::Simulated)
    }

    pub fn applied(candidate: &RemovalCandidate, size: u64) -> Self {
        Self::from_candidate(candidate, size, Outcome::Applied)
    }

    /// Applied no-op: the dependency key was not in the manifest.
    pub fn already_absent(candidate: &RemovalCandidate) -> Self {
        let mut op = Self::from_candidate(candidate, 0, Outcome::Applied);
        op.already_absent = true;
        op
    }

    pub fn failed(candidate: &RemovalCandidate, size: u64, message: impl Into<String>) -> Self {
        let mut op = Self::from_candidate(candidate, size, Outcome::Failed);
        op.error_message = Some(message.into());
        op
    }

    pub fn is_file_removal(&self) -> bool {
        self.op_type == OperationType::RemoveFile
    }

    /// Whether this operation changed, or in a dry run would change, the project.
    pub fn changes_project(&self) -> bool {
        self.outcome != Outcome::Failed && !self.already_absent
    }
}

/// Totals reported at the end of a run.
///
/// The `*_removed` and `bytes_freed` fields only count removals that
/// happened. A dry run reports its projection in the `*_to_remove` and
/// `bytes_to_free` fields instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_operations: usize,
    pub files_removed: usize,
    pub dependencies_removed: usize,
    /// Sum of `size` over applied file removals.
    pub bytes_freed: u64,
    pub files_to_remove: usize,
    pub dependencies_to_remove: usize,
    pub bytes_to_free: u64,
    /// Dependency keys that were already absent.
    pub unchanged: usize,
    pub failed: usize,
}
