//! Project context resolution for sweep.
//!
//! Resolves the project root (explicit argument or current working directory)
//! and the fixed state layout that every command shares:
//!
//! ```text
//! {project_root}/.sweep/
//!   config.yaml          optional configuration
//!   candidates.json      default candidates document
//!   rollback.json        rollback manifest of the latest apply run
//!   backups/files/...    mirrored backups of the latest apply run
//!   events/events.ndjson audit log
//! ```

use crate::error::{Result, SweepError};
use std::env;
use std::path::{Path, PathBuf};

/// State directory name, relative to the project root.
pub const STATE_DIR: &str = ".sweep";

/// Resolved absolute paths for one project.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Absolute, canonical project root. Candidate paths are relative to it.
    pub project_root: PathBuf,

    /// `{project_root}/.sweep/`
    pub state_dir: PathBuf,

    /// `{project_root}/.sweep/backups/files/`
    pub backup_root: PathBuf,
}

impl ProjectContext {
    /// Resolve the context from an optional project root argument.
    ///
    /// Without an argument the current working directory is used.
    pub fn resolve(project_root: Option<&Path>) -> Result<Self> {
        match project_root {
            Some(root) => Self::resolve_from(root),
            None => {
                let cwd = env::current_dir().map_err(|e| {
                    SweepError::UserError(format!(
                        "failed to get current working directory: {}",
                        e
                    ))
                })?;
                Self::resolve_from(cwd)
            }
        }
    }

    /// Resolve the context for a specific directory.
    pub fn resolve_from<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();

        if !root.is_dir() {
            return Err(SweepError::UserError(format!(
                "project root '{}' does not exist or is not a directory",
                root.display()
            )));
        }

        let project_root = root.canonicalize().map_err(|e| {
            SweepError::UserError(format!(
                "failed to resolve project root '{}': {}",
                root.display(),
                e
            ))
        })?;

        let state_dir = project_root.join(STATE_DIR);
        let backup_root = state_dir.join("backups").join("files");

        Ok(Self {
            project_root,
            state_dir,
            backup_root,
        })
    }

    /// Path to the optional config file.
    pub fn config_path(&self) -> PathBuf {
        self.state_dir.join("config.yaml")
    }

    /// Fixed location of the rollback manifest.
    pub fn rollback_manifest_path(&self) -> PathBuf {
        self.state_dir.join("rollback.json")
    }

    /// Directory holding the audit event log.
    pub fn events_dir(&self) -> PathBuf {
        self.state_dir.join("events")
    }

    /// Resolve a project-relative path to an absolute one.
    ///
    /// Absolute inputs are returned unchanged.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}
