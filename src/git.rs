//! Read-only git probe.
//!
//! sweep only ever asks git for the current revision, to stamp it into the
//! rollback manifest. It never stages, commits, or checks anything out.

use std::path::Path;
use std::process::{Command, Output};

/// Result of a successful git command execution.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Standard output from the command (trimmed).
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
}

impl GitOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }
}

/// Run a git command in `cwd`.
///
/// A non-zero exit is returned as an error carrying git's stderr (or stdout
/// when stderr is empty).
pub fn run_git<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<GitOutput, String> {
    let output = Command::new("git")
        .current_dir(cwd.as_ref())
        .args(args)
        .output()
        .map_err(|e| format!("failed to execute git {}: {}", args.first().unwrap_or(&""), e))?;

    let git_output = GitOutput::from_output(&output);

    if output.status.success() {
        Ok(git_output)
    } else {
        let error_msg = if git_output.stderr.is_empty() {
            git_output.stdout
        } else {
            git_output.stderr
        };
        Err(format!(
            "git {} failed (exit code {}): {}",
            args.first().unwrap_or(&""),
            output.status.code().unwrap_or(-1),
            error_msg
        ))
    }
}

/// `HEAD` of the repository containing `root`, if there is one.
///
/// Returns `None` outside a repository, in a repository without commits, or
/// when git is not installed.
pub fn current_revision<P: AsRef<Path>>(root: P) -> Option<String> {
    run_git(root, &["rev-parse", "--verify", "--quiet", "HEAD"])
        .ok()
        .map(|output| output.stdout)
        .filter(|sha| !sha.is_empty())
}
