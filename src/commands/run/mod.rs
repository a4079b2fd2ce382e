//! Implementation of the `sweep run` command.
//!
//! Loads the candidates document and feeds it to the removal engine.
//!
//! # Safety
//!
//! - Default behavior is a dry run (prints what would be removed)
//! - Requires `--apply` to back up and remove anything
//! - Refused paths (absolute, `..`, `.sweep/`, protected globs) are reported
//!   as failed operations in both modes
//!
//! # Logging
//!
//! An apply run appends an `apply` event with the summary. A dry run writes
//! nothing at all.

mod display;


use super::log_event;
use crate::candidates::CandidateSet;
use crate::cli::RunArgs;
use crate::config::Config;
use crate::context::ProjectContext;
use crate::engine::{EngineSettings, RemovalEngine, RunReport};
use crate::error::{Result, SweepError};
use crate::events::{Event, EventAction};
use crate::fs::{FileSystem, RealFs};
use crate::git;
use crate::ledger::RunMode;
use serde_json::json;
use std::path::Path;

use display::{print_candidate_overview, print_report, print_skipped_warnings};

/// Execute the `sweep run` command.
///
/// Exits successfully whenever the batch was processed, even if individual
/// operations failed; those are listed in the report.
pub fn cmd_run(args: RunArgs) -> Result<()> {
    let ctx = ProjectContext::resolve(args.project_root.as_deref())?;
    let config = Config::load_or_default(ctx.config_path())?;
    let mode = RunMode::from_apply_flag(args.apply);

    let candidates_path = args
        .candidates
        .unwrap_or_else(|| ctx.resolve_path(&config.candidates_file));
    let candidates = CandidateSet::load(&candidates_path)?;

    if candidates.is_empty() {
        println!("No removal candidates in {}.", candidates_path.display());
        return Ok(());
    }

    if !args.json {
        print_candidate_overview(&candidates, &candidates_path, &ctx.project_root);
    }

    let report = execute(&RealFs, &ctx, &config, &candidates, mode)?;

    print_skipped_warnings(&report);
    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| {
            SweepError::UserError(format!("failed to serialize run report: {}", e))
        })?;
        println!("{}", json);
    } else {
        print_report(&report, &ctx.project_root);
    }

    if mode.is_apply() {
        log_event(&ctx, &config, apply_event(&report, &candidates_path));
    }

    Ok(())
}

/// Run the engine over `candidates` in the given mode.
///
/// The VCS revision is only probed for apply runs with
/// `record_vcs_revision` enabled.
pub(crate) fn execute<F: FileSystem>(
    fs: &F,
    ctx: &ProjectContext,
    config: &Config,
    candidates: &CandidateSet,
    mode: RunMode,
) -> Result<RunReport> {
    let revision = if mode.is_apply() && config.record_vcs_revision {
        git::current_revision(&ctx.project_root)
    } else {
        None
    };

    let settings = EngineSettings::new(ctx, config)?.with_vcs_revision(revision);
    RemovalEngine::new(fs, settings, mode).run(candidates)
}

fn apply_event(report: &RunReport, candidates_path: &Path) -> Event {
    Event::new(EventAction::Apply).with_details(json!({
        "candidates": candidates_path.display().to_string(),
        "operations": report.summary.total_operations,
        "files_removed": report.summary.files_removed,
        "dependencies_removed": report.summary.dependencies_removed,
        "bytes_freed": report.summary.bytes_freed,
        "unchanged": report.summary.unchanged,
        "failed": report.summary.failed,
        "skipped": report.skipped.len(),
        "rollback_manifest": report.rollback_manifest.as_ref().map(|p| p.display().to_string()),
    }))
}
