//! Implementation of the `sweep rollback` command.
//!
//! Restores what the latest apply run removed. Only a missing or corrupt
//! rollback manifest makes the command fail; files that cannot be restored
//! are reported and the command still succeeds.
//!
//! # Logging
//!
//! Appends a `rollback` event with the restore counts.


use super::log_event;
use crate::cli::RollbackArgs;
use crate::config::Config;
use crate::context::ProjectContext;
use crate::error::Result;
use crate::events::{Event, EventAction};
use crate::fs::RealFs;
use crate::rollback::{RestoreStatus, RollbackEngine, RollbackReport};
use serde_json::json;

/// Execute the `sweep rollback` command.
pub fn cmd_rollback(args: RollbackArgs) -> Result<()> {
    let ctx = ProjectContext::resolve(args.project_root.as_deref())?;
    let config = Config::load_or_default(ctx.config_path())?;

    let report = RollbackEngine::new(&RealFs, &ctx, &config).run()?;

    print_report(&report);
    log_event(&ctx, &config, rollback_event(&report));

    Ok(())
}

fn print_report(report: &RollbackReport) {
    if report.root_mismatch() {
        eprintln!(
            "Warning: rollback manifest was recorded for '{}'; restoring into '{}'",
            report.recorded_root.display(),
            report.current_root.display()
        );
    }

    println!(
        "Rolling back apply run from {}",
        report.applied_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();

    for entry in report.entries() {
        match entry.status {
            RestoreStatus::Restored => println!("  Restored: {}", entry.path),
            RestoreStatus::Skipped => println!("  Skipped:  {} (no backup)", entry.path),
            RestoreStatus::Failed => {
                println!("  Failed:   {}", entry.path);
                if let Some(message) = &entry.message {
                    eprintln!("Warning: {}", message);
                }
            }
        }
    }

    println!();
    println!("Rollback complete:");
    println!("  Restored: {}", report.count(RestoreStatus::Restored));
    println!("  Skipped:  {}", report.count(RestoreStatus::Skipped));
    println!("  Failed:   {}", report.count(RestoreStatus::Failed));
    if report.has_failures() {
        eprintln!("Warning: some targets were not restored; their backups are kept under .sweep/backups/files");
    }

    if let Some(revision) = &report.vcs_revision {
        println!();
        println!("Files were removed at revision {}.", revision);
        println!("Source control was not modified; review with your VCS before committing.");
    }
}

fn rollback_event(report: &RollbackReport) -> Event {
    Event::new(EventAction::Rollback).with_details(json!({
        "applied_at": report.applied_at.to_rfc3339(),
        "restored": report.count(RestoreStatus::Restored),
        "skipped": report.count(RestoreStatus::Skipped),
        "failed": report.count(RestoreStatus::Failed),
        "dependency_manifest_restored": report
            .dependency_manifest
            .as_ref()
            .is_some_and(|e| e.status == RestoreStatus::Restored),
        "vcs_revision": report.vcs_revision,
    }))
}
