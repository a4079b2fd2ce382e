//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Configuration for a sweep project.
///
/// This struct represents the contents of `.sweep/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Candidates document used when `--candidates` is not given.
    #[serde(default = "default_candidates_file")]
    pub candidates_file: String,

    /// JSON manifest holding `dependencies` / `devDependencies`.
    #[serde(default = "default_dependency_manifest")]
    pub dependency_manifest: String,

    /// Glob patterns (project-relative) that are refused for removal.
    #[serde(default = "default_protected_paths")]
    pub protected_paths: Vec<String>,

    /// Capture `git rev-parse HEAD` into the rollback manifest.
    #[serde(default = "default_true")]
    pub record_vcs_revision: bool,

    /// Append apply/rollback events to `.sweep/events/events.ndjson`.
    #[serde(default = "default_true")]
    pub log_events: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            candidates_file: default_candidates_file(),
            dependency_manifest: default_dependency_manifest(),
            protected_paths: default_protected_paths(),
            record_vcs_revision: default_true(),
            log_events: default_true(),
        }
    }
}
