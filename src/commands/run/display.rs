//! Display and formatting utilities for run command output.

use crate::candidates::{CandidateSet, Category};
use crate::engine::RunReport;
use crate::ledger::{Operation, OperationType, Outcome};
use std::path::Path;

/// Print how many candidates of each category were loaded.
pub fn print_candidate_overview(candidates: &CandidateSet, source: &Path, project_root: &Path) {
    println!(
        "Loaded {} candidate(s) from {}:",
        candidates.len(),
        make_relative(source, project_root)
    );
    for category in Category::ALL {
        let count = candidates.count(category);
        if count > 0 {
            println!("  {:<18} {}", category.to_string(), count);
        }
    }
    println!();
}

/// Print one warning line per skipped candidate to stderr.
pub fn print_skipped_warnings(report: &RunReport) {
    for skipped in &report.skipped {
        eprintln!(
            "Warning: skipped {} '{}': {}",
            skipped.category, skipped.path, skipped.reason
        );
    }
}

/// Print the run report in a readable format.
pub fn print_report(report: &RunReport, project_root: &Path) {
    if report.is_dry_run() {
        println!("Dry run: no files will be changed.");
    } else {
        println!("Applied removal plan in {}", project_root.display());
    }
    println!();

    if !report.operations.is_empty() {
        println!("Operations ({}):", report.operations.len());
        for op in &report.operations {
            println!("  {}", describe_operation(op));
        }
        println!();
    }

    let summary = &report.summary;
    println!("Summary:");
    println!("  Operations:            {}", summary.total_operations);
    if report.is_dry_run() {
        println!("  Files to remove:       {}", summary.files_to_remove);
        println!("  Dependencies to remove: {}", summary.dependencies_to_remove);
        println!("  Space to free:         {}", format_size(summary.bytes_to_free));
    } else {
        println!("  Files removed:         {}", summary.files_removed);
        println!("  Dependencies removed:  {}", summary.dependencies_removed);
        println!("  Space freed:           {}", format_size(summary.bytes_freed));
        if summary.unchanged > 0 {
            println!("  Already absent:        {}", summary.unchanged);
        }
    }
    if summary.failed > 0 {
        println!("  Failed:                {}", summary.failed);
    }
    if !report.skipped.is_empty() {
        println!("  Skipped:               {}", report.skipped.len());
    }

    println!();
    if report.is_dry_run() {
        println!("Dry-run mode: no changes made.");
        println!("Run with --apply to perform the removal.");
    } else if let Some(manifest) = &report.rollback_manifest {
        println!(
            "Rollback manifest written to {}",
            make_relative(manifest, project_root)
        );
        println!("Run `sweep rollback` to undo this run.");
    } else {
        println!("Nothing was removed; no rollback manifest written.");
    }
}

/// One-line description of an operation.
fn describe_operation(op: &Operation) -> String {
    let mut line = format!("{:<11} {} {}", format!("[{}]", op.outcome), op.op_type, op.target);

    match op.op_type {
        OperationType::RemoveFile => {
            line.push_str(&format!(" ({})", format_size(op.size)));
            if let Some(original) = &op.related_path {
                line.push_str(&format!(" duplicate of {}", original));
            }
        }
        OperationType::RemoveDependency => {
            if let Some(group) = &op.related_path {
                line.push_str(&format!(" [{}]", group));
            }
            if op.already_absent {
                line.push_str(" (already absent)");
            }
        }
    }

    if op.outcome == Outcome::Failed
        && let Some(message) = &op.error_message
    {
        line.push_str(&format!(": {}", message));
    } else {
        line.push_str(&format!(" - {}", op.reason));
    }

    line
}

/// Human-readable byte count: `0 Bytes`, `120 Bytes`, `1.5 KB`, `2.25 MB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// Make a path relative to project_root for display.
pub fn make_relative(path: &Path, project_root: &Path) -> String {
    path.strip_prefix(project_root)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| path.display().to_string())
}
