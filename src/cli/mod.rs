//! CLI argument parsing for sweep.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Sweep: remove dead files, duplicates, and unused dependencies safely.
///
/// Every removal is backed up first and the latest apply run can be undone
/// with `sweep rollback`:
/// - `run` is a dry run unless `--apply` is given
/// - backups and the rollback manifest live under `.sweep/`
#[derive(Parser, Debug)]
#[command(name = "sweep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for sweep.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Process a candidates document.
    ///
    /// Prints what would be removed. With `--apply`, backs up and removes
    /// each candidate and writes the rollback manifest.
    Run(RunArgs),

    /// Undo the latest apply run.
    ///
    /// Restores backed-up files and the dependency manifest. Source control
    /// is never touched.
    Rollback(RollbackArgs),

    /// Show what the latest apply run removed and whether its backups exist.
    Inspect(InspectArgs),
}

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Project root (defaults to the current directory).
    pub project_root: Option<PathBuf>,

    /// Actually remove candidates (default is a dry run).
    #[arg(long)]
    pub apply: bool,

    /// Candidates document (defaults to `candidates_file` from config).
    #[arg(long, value_name = "FILE")]
    pub candidates: Option<PathBuf>,

    /// Print the run report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `rollback` command.
#[derive(Args, Debug)]
pub struct RollbackArgs {
    /// Project root (defaults to the current directory).
    pub project_root: Option<PathBuf>,
}

/// Arguments for the `inspect` command.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Project root (defaults to the current directory).
    pub project_root: Option<PathBuf>,

    /// Print the manifest and backup status as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
