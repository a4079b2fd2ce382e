//! Implementation of the `sweep inspect` command.
//!
//! Read-only view of the latest apply run: what the rollback manifest lists
//! and whether each backup needed to undo it is still on disk.

use crate::backup::BackupStore;
use crate::cli::InspectArgs;
use crate::config::Config;
use crate::context::ProjectContext;
use crate::error::{Result, SweepError};
use crate::fs::RealFs;
use crate::ledger::RollbackManifest;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupStatus {
    pub path: String,
    pub present: bool,
}

/// The rollback manifest together with the backup status of every target.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    pub manifest: RollbackManifest,
    pub files_removed: usize,
    pub dependencies_removed: usize,
    pub bytes_freed: u64,
    /// One entry per `remove_file` operation, in manifest order.
    pub backups: Vec<BackupStatus>,
    /// Present when the run removed dependencies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependency_manifest_backup: Option<BackupStatus>,
}

impl Inspection {
    pub fn missing_backups(&self) -> impl Iterator<Item = &BackupStatus> {
        self.backups
            .iter()
            .chain(self.dependency_manifest_backup.as_ref())
            .filter(|b| !b.present)
    }

    /// Whether a rollback right now would restore everything.
    pub fn is_restorable(&self) -> bool {
        self.missing_backups().next().is_none()
    }
}

/// Load the rollback manifest and check its backups.
pub fn inspect(ctx: &ProjectContext, config: &Config) -> Result<Inspection> {
    let manifest = RollbackManifest::load(&ctx.rollback_manifest_path())?;
    let store = BackupStore::new(&RealFs, &ctx.project_root, &ctx.backup_root);

    let backups = manifest
        .file_operations()
        .map(|op| BackupStatus {
            path: op.target.clone(),
            present: store.has_backup(&op.target),
        })
        .collect();

    let dependency_manifest_backup = manifest.dependency_operations().next().map(|_| {
        let path = manifest
            .dependency_manifest
            .clone()
            .unwrap_or_else(|| config.dependency_manifest.clone());
        BackupStatus {
            present: store.has_backup(&path),
            path,
        }
    });

    Ok(Inspection {
        files_removed: manifest.file_operations().count(),
        dependencies_removed: manifest.dependency_operations().count(),
        bytes_freed: manifest.file_operations().map(|op| op.size).sum(),
        backups,
        dependency_manifest_backup,
        manifest,
    })
}

/// Execute the `sweep inspect` command.
pub fn cmd_inspect(args: InspectArgs) -> Result<()> {
    let ctx = ProjectContext::resolve(args.project_root.as_deref())?;
    let config = Config::load_or_default(ctx.config_path())?;

    let inspection = inspect(&ctx, &config)?;

    if args.json {
        let json = serde_json::to_string_pretty(&inspection).map_err(|e| {
            SweepError::UserError(format!("failed to serialize inspection: {}", e))
        })?;
        println!("{}", json);
        return Ok(());
    }

    print_inspection(&inspection, &ctx);
    Ok(())
}

fn print_inspection(inspection: &Inspection, ctx: &ProjectContext) {
    let manifest = &inspection.manifest;

    println!("Latest apply run:");
    println!(
        "  Applied at:    {}",
        manifest.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("  Project root:  {}", manifest.project_root.display());
    if manifest.project_root != ctx.project_root {
        println!("                 (current root: {})", ctx.project_root.display());
    }
    println!(
        "  Revision:      {}",
        manifest.vcs_revision.as_deref().unwrap_or("(not recorded)")
    );
    println!();
    println!("Operations:");
    println!("  Files removed:         {}", inspection.files_removed);
    println!("  Dependencies removed:  {}", inspection.dependencies_removed);
    println!("  Bytes freed:           {}", inspection.bytes_freed);
    println!();

    if inspection.is_restorable() {
        println!("All backups present; `sweep rollback` can restore this run.");
    } else {
        println!("Missing backups:");
        for missing in inspection.missing_backups() {
            println!("  - {}", missing.path);
        }
    }
}
