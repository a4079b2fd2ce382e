//! Pure decision logic for the removal engine.
//!
//! Nothing in here touches the filesystem: callers probe the world first and
//! pass the observations in, then carry out whatever these functions decide.

use crate::candidates::{CandidateKind, DependencyGroup, RemovalCandidate};
use crate::context::STATE_DIR;
use crate::ledger::RunMode;
use globset::GlobSet;
use serde_json::Value;
use std::path::{Component, Path};

/// What a probe of the candidate's target found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileProbe {
    Missing,
    NotAFile,
    Present { len: u64 },
}

/// What to do with a file candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileDecision {
    /// Target vanished; no operation is recorded.
    Skip { reason: String },
    /// Record a failed operation without touching anything.
    Refuse { message: String },
    /// Dry run: record a simulated operation.
    Simulate { size: u64 },
    /// Apply: back up, verify, delete.
    Remove { size: u64 },
}

/// Check whether a candidate path may be touched at all.
///
/// Returns the refusal message for paths that are absolute, contain `..`,
/// point into the state directory, or match a protected glob.
pub fn refusal_reason(path: &str, protected: &GlobSet) -> Option<String> {
    let as_path = Path::new(path);

    if as_path.is_absolute() || as_path.has_root() {
        return Some(format!("refusing to remove absolute path '{}'", path));
    }

    if path_contains_traversal(as_path) {
        return Some(format!("refusing to remove path with traversal '{}'", path));
    }

    let normalized = normalize(as_path);
    if normalized.is_empty() {
        return Some(format!("refusing to remove project root ('{}')", path));
    }

    if Path::new(&normalized).starts_with(STATE_DIR) {
        return Some(format!(
            "refusing to remove '{}' inside the {} state directory",
            path, STATE_DIR
        ));
    }

    if protected.is_match(&normalized) {
        return Some(format!("refusing to remove protected path '{}'", path));
    }

    None
}

/// Check if a path contains any `..` components.
pub fn path_contains_traversal(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::ParentDir))
}

/// Join normal components with `/`, dropping `.` segments.
fn normalize(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Decide what happens to a file candidate.
///
/// `original_present` is only consulted for duplicates: a duplicate whose
/// retained original is gone is refused, since deleting it would drop the
/// last working copy.
pub fn decide_file(
    candidate: &RemovalCandidate,
    mode: RunMode,
    probe: FileProbe,
    original_present: bool,
) -> FileDecision {
    let len = match probe {
        FileProbe::Missing => {
            return FileDecision::Skip {
                reason: format!("file not found: {}", candidate.path),
            };
        }
        FileProbe::NotAFile => {
            return FileDecision::Refuse {
                message: format!("'{}' is not a regular file", candidate.path),
            };
        }
        FileProbe::Present { len } => len,
    };

    if let CandidateKind::DuplicateFile { original } = &candidate.kind
        && !original_present
    {
        return FileDecision::Refuse {
            message: format!(
                "retained original '{}' is missing; refusing to remove duplicate '{}'",
                original, candidate.path
            ),
        };
    }

    let size = if candidate.size > 0 { candidate.size } else { len };

    match mode {
        RunMode::DryRun => FileDecision::Simulate { size },
        RunMode::Apply => FileDecision::Remove { size },
    }
}

/// Find the manifest section that holds `name`.
///
/// With an explicit group only that section is consulted; without one,
/// `dependencies` is checked before `devDependencies`.
pub fn locate_dependency(
    manifest: &Value,
    name: &str,
    group: Option<DependencyGroup>,
) -> Option<DependencyGroup> {
    let groups: &[DependencyGroup] = match group {
        Some(DependencyGroup::Production) => &[DependencyGroup::Production],
        Some(DependencyGroup::Development) => &[DependencyGroup::Development],
        None => &[DependencyGroup::Production, DependencyGroup::Development],
    };

    groups.iter().copied().find(|g| {
        manifest
            .get(g.manifest_key())
            .and_then(Value::as_object)
            .is_some_and(|section| section.contains_key(name))
    })
}

/// Remove `name` from `group` in the manifest. Returns true if a key was removed.
pub fn remove_dependency(manifest: &mut Value, name: &str, group: DependencyGroup) -> bool {
    manifest
        .get_mut(group.manifest_key())
        .and_then(Value::as_object_mut)
        .is_some_and(|section| section.shift_remove(name).is_some())
}
