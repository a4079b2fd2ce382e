//! Tests for the removal engine.

use super::*;
use crate::candidates::CandidateSet;
use crate::config::Config;
use crate::context::ProjectContext;
use crate::error::SweepError;
use crate::fs::RealFs;
use crate::fs::test_doubles::FaultyFs;
use crate::ledger::{OperationType, Outcome, RollbackManifest};
use crate::rollback::{RestoreStatus, RollbackEngine};
use crate::test_support::{create_test_project, snapshot, write_file};
use std::fs;
use tempfile::TempDir;

const ALL_CATEGORIES: &str = r#"{
    "dead_file": [{"path": "old/util.js", "reason": "no imports", "size": 120}],
    "orphaned_file": [{"path": "src/orphan.css", "reason": "no references"}],
    "duplicate_file": [{"path": "src/b.js", "relatedPath": "src/a.js"}],
    "unused_dependency": [{"path": "lodash", "relatedPath": "dependency"}]
}"#;

fn setup() -> (TempDir, ProjectContext) {
    let temp_dir = create_test_project();
    let ctx = ProjectContext::resolve_from(temp_dir.path()).unwrap();
    (temp_dir, ctx)
}

fn run_with<F: FileSystem>(
    fs: &F,
    ctx: &ProjectContext,
    mode: RunMode,
    json: &str,
) -> crate::error::Result<RunReport> {
    let settings = EngineSettings::new(ctx, &Config::default())
        .unwrap()
        .with_vcs_revision(Some("deadbeef".to_string()));
    let candidates = CandidateSet::from_json(json).unwrap();
    RemovalEngine::new(fs, settings, mode).run(&candidates)
}

fn run(ctx: &ProjectContext, mode: RunMode, json: &str) -> RunReport {
    run_with(&RealFs, ctx, mode, json).unwrap()
}

/// Project files, ignoring sweep's own state directory.
fn project_files(ctx: &ProjectContext) -> Vec<(String, Vec<u8>)> {
    snapshot(&ctx.project_root)
        .into_iter()
        .filter(|(path, _)| !path.starts_with(".sweep"))
        .collect()
}

fn op<'r>(report: &'r RunReport, target: &str) -> &'r Operation {
    report
        .operations
        .iter()
        .find(|o| o.target == target)
        .unwrap_or_else(|| panic!("no operation for {}", target))
}

#[test]
fn test_dry_run_has_zero_side_effects() {
    let (_temp_dir, ctx) = setup();
    let before = snapshot(&ctx.project_root);

    let report = run(&ctx, RunMode::DryRun, ALL_CATEGORIES);

    assert_eq!(snapshot(&ctx.project_root), before);
    assert!(!ctx.state_dir.exists());
    assert!(report.is_dry_run());
    assert!(report.rollback_manifest.is_none());
    assert_eq!(report.operations.len(), 4);
    assert!(
        report
            .operations
            .iter()
            .all(|o| o.outcome == Outcome::Simulated)
    );
}

#[test]
fn test_dry_run_performs_no_mutating_calls() {
    let (_temp_dir, ctx) = setup();
    let fs = FaultyFs::new();

    run_with(&fs, &ctx, RunMode::DryRun, ALL_CATEGORIES).unwrap();

    assert_eq!(fs.mutations.get(), 0);
}

#[test]
fn test_dry_run_is_reproducible() {
    let (_temp_dir, ctx) = setup();

    let first = run(&ctx, RunMode::DryRun, ALL_CATEGORIES);
    let second = run(&ctx, RunMode::DryRun, ALL_CATEGORIES);

    let shape = |r: &RunReport| {
        r.operations
            .iter()
            .map(|o| (o.op_type, o.target.clone(), o.outcome, o.size))
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(&first), shape(&second));
    assert_eq!(first.summary, second.summary);
}

#[test]
fn test_simple_dead_file() {
    let (_temp_dir, ctx) = setup();
    let json = r#"{"dead_file": [{"path": "old/util.js", "reason": "no imports", "size": 120}]}"#;

    let report = run(&ctx, RunMode::Apply, json);

    let op = op(&report, "old/util.js");
    assert_eq!(op.op_type, OperationType::RemoveFile);
    assert_eq!(op.outcome, Outcome::Applied);
    assert_eq!(op.size, 120);
    assert!(!ctx.project_root.join("old/util.js").exists());
    assert!(ctx.backup_root.join("old/util.js").is_file());
    assert_eq!(report.summary.files_removed, 1);
    assert_eq!(report.summary.bytes_freed, 120);
    assert_eq!(report.rollback_manifest, Some(ctx.rollback_manifest_path()));
}

#[test]
fn test_backup_is_byte_identical_to_deleted_file() {
    let (_temp_dir, ctx) = setup();
    let originals: Vec<_> = ["old/util.js", "src/orphan.css", "src/b.js"]
        .iter()
        .map(|p| (p.to_string(), fs::read(ctx.project_root.join(p)).unwrap()))
        .collect();

    let report = run(&ctx, RunMode::Apply, ALL_CATEGORIES);

    for (path, bytes) in originals {
        assert_eq!(op(&report, &path).outcome, Outcome::Applied);
        assert!(!ctx.project_root.join(&path).exists());
        assert_eq!(fs::read(ctx.backup_root.join(&path)).unwrap(), bytes);
    }
}

#[test]
fn test_duplicate_retains_original() {
    let (_temp_dir, ctx) = setup();
    let original = fs::read(ctx.project_root.join("src/a.js")).unwrap();
    let json = r#"{"duplicate_file": [{"path": "src/b.js", "relatedPath": "src/a.js"}]}"#;

    let report = run(&ctx, RunMode::Apply, json);

    let op = op(&report, "src/b.js");
    assert_eq!(op.outcome, Outcome::Applied);
    assert_eq!(op.related_path.as_deref(), Some("src/a.js"));
    assert!(!ctx.project_root.join("src/b.js").exists());
    assert_eq!(fs::read(ctx.project_root.join("src/a.js")).unwrap(), original);
    assert!(!ctx.backup_root.join("src/a.js").exists());
}

#[test]
fn test_duplicate_with_missing_original_is_refused() {
    let (_temp_dir, ctx) = setup();
    let json = r#"{"duplicate_file": [{"path": "src/b.js", "relatedPath": "src/gone.js"}]}"#;

    let report = run(&ctx, RunMode::Apply, json);

    assert_eq!(op(&report, "src/b.js").outcome, Outcome::Failed);
    assert!(ctx.project_root.join("src/b.js").exists());
}

#[test]
fn test_unused_dependency_removed_and_backed_up() {
    let (_temp_dir, ctx) = setup();
    let manifest_path = ctx.project_root.join("package.json");
    let original = fs::read_to_string(&manifest_path).unwrap();
    let json = r#"{"unused_dependency": [{"path": "lodash", "relatedPath": "dependency"}]}"#;

    let report = run(&ctx, RunMode::Apply, json);

    let op = op(&report, "lodash");
    assert_eq!(op.op_type, OperationType::RemoveDependency);
    assert_eq!(op.outcome, Outcome::Applied);
    assert_eq!(op.size, 0);

    let updated: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&manifest_path).unwrap()).unwrap();
    assert!(updated["dependencies"].get("lodash").is_none());
    assert_eq!(updated["dependencies"]["react"], "^18.2.0");
    assert_eq!(updated["devDependencies"]["jest"], "^29.0.0");

    assert_eq!(
        fs::read_to_string(ctx.backup_root.join("package.json")).unwrap(),
        original
    );
    assert_eq!(report.summary.dependencies_removed, 1);

    let manifest = RollbackManifest::load(&ctx.rollback_manifest_path()).unwrap();
    assert_eq!(manifest.dependency_manifest.as_deref(), Some("package.json"));
}

#[test]
fn test_manifest_keeps_key_order_and_formatting() {
    let (_temp_dir, ctx) = setup();
    let json = r#"{"unused_dependency": [{"path": "lodash", "relatedPath": "dependency"}]}"#;

    run(&ctx, RunMode::Apply, json);

    let content = fs::read_to_string(ctx.project_root.join("package.json")).unwrap();
    assert_eq!(
        content,
        r#"{
  "name": "demo",
  "version": "1.0.0",
  "dependencies": {
    "react": "^18.2.0"
  },
  "devDependencies": {
    "jest": "^29.0.0"
  }
}
"#
    );
}

#[test]
fn test_dev_dependency_without_group_is_found() {
    let (_temp_dir, ctx) = setup();
    let json = r#"{"unused_dependency": [{"path": "jest"}]}"#;

    let report = run(&ctx, RunMode::Apply, json);

    assert_eq!(op(&report, "jest").outcome, Outcome::Applied);
    let updated: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(ctx.project_root.join("package.json")).unwrap())
            .unwrap();
    assert!(updated["devDependencies"].get("jest").is_none());
}

#[test]
fn test_absent_dependency_is_noop_success() {
    let (_temp_dir, ctx) = setup();
    let manifest_path = ctx.project_root.join("package.json");
    let before = fs::read(&manifest_path).unwrap();
    let json = r#"{"unused_dependency": [{"path": "left-pad", "relatedPath": "dependency"}]}"#;

    let report = run(&ctx, RunMode::Apply, json);

    let op = op(&report, "left-pad");
    assert_eq!(op.outcome, Outcome::Applied);
    assert!(op.already_absent);
    assert_eq!(report.summary.dependencies_removed, 0);
    assert_eq!(report.summary.unchanged, 1);
    assert_eq!(fs::read(&manifest_path).unwrap(), before);
    assert!(!ctx.backup_root.exists());
    assert!(report.rollback_manifest.is_none());
    assert!(!ctx.rollback_manifest_path().exists());
}

#[test]
fn test_reapplying_batch_keeps_previous_run_restorable() {
    let (_temp_dir, ctx) = setup();
    let original = project_files(&ctx);
    run(&ctx, RunMode::Apply, ALL_CATEGORIES);
    let first_manifest = fs::read(ctx.rollback_manifest_path()).unwrap();

    let rerun = run(&ctx, RunMode::Apply, ALL_CATEGORIES);

    assert_eq!(rerun.skipped.len(), 3);
    assert!(op(&rerun, "lodash").already_absent);
    assert!(rerun.rollback_manifest.is_none());
    assert_eq!(fs::read(ctx.rollback_manifest_path()).unwrap(), first_manifest);
    assert!(ctx.backup_root.join("old/util.js").exists());
    assert!(ctx.backup_root.join("package.json").exists());

    let report = RollbackEngine::new(&RealFs, &ctx, &Config::default())
        .run()
        .unwrap();

    assert!(report.entries().all(|e| e.status == RestoreStatus::Restored));
    assert_eq!(report.count(RestoreStatus::Restored), 4);
    assert_eq!(project_files(&ctx), original);
}

#[test]
fn test_missing_file_is_skipped_without_operation() {
    let (_temp_dir, ctx) = setup();
    let json = r#"{"dead_file": [
        {"path": "does/not/exist.js", "size": 10},
        {"path": "old/util.js", "size": 120}
    ]}"#;

    let report = run(&ctx, RunMode::Apply, json);

    assert_eq!(report.operations.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, "does/not/exist.js");
    assert!(report.skipped[0].reason.contains("not found"));
    assert_eq!(op(&report, "old/util.js").outcome, Outcome::Applied);
}

#[test]
fn test_operation_count_matches_candidates_minus_skips() {
    let json = r#"{
        "dead_file": [{"path": "old/util.js"}, {"path": "missing-1.js"}],
        "orphaned_file": [{"path": "src/orphan.css"}, {"path": "missing-2.css"}],
        "duplicate_file": [{"path": "src/b.js", "relatedPath": "src/a.js"}],
        "unused_dependency": [{"path": "lodash"}, {"path": "not-there"}]
    }"#;
    let candidates = CandidateSet::from_json(json).unwrap();

    for mode in [RunMode::DryRun, RunMode::Apply] {
        let (_temp_dir, ctx) = setup();
        let report = run(&ctx, mode, json);
        assert_eq!(
            report.operations.len(),
            candidates.len() - report.skipped.len()
        );
        assert_eq!(report.skipped.len(), 2);
    }
}

#[test]
fn test_partial_failure_is_isolated() {
    let (_temp_dir, ctx) = setup();
    let failing = ctx.project_root.join("src/orphan.css");
    let fs = FaultyFs::new().failing_remove(&failing);

    let report = run_with(&fs, &ctx, RunMode::Apply, ALL_CATEGORIES).unwrap();

    let failed = op(&report, "src/orphan.css");
    assert_eq!(failed.outcome, Outcome::Failed);
    assert!(failed.error_message.as_deref().unwrap().contains("permission denied"));
    assert!(failing.exists());

    assert_eq!(op(&report, "old/util.js").outcome, Outcome::Applied);
    assert_eq!(op(&report, "src/b.js").outcome, Outcome::Applied);
    assert_eq!(op(&report, "lodash").outcome, Outcome::Applied);
    assert_eq!(report.summary.failed, 1);

    let manifest = RollbackManifest::load(&ctx.rollback_manifest_path()).unwrap();
    assert_eq!(manifest.operations.len(), 3);
    assert!(manifest.operations.iter().all(|o| o.target != "src/orphan.css"));
}

#[test]
fn test_failed_backup_never_deletes() {
    let (_temp_dir, ctx) = setup();
    let target = ctx.project_root.join("old/util.js");
    let fs = FaultyFs::new().failing_copy_from(&target);
    let json = r#"{"dead_file": [{"path": "old/util.js"}, {"path": "src/orphan.css"}]}"#;

    let report = run_with(&fs, &ctx, RunMode::Apply, json).unwrap();

    let failed = op(&report, "old/util.js");
    assert_eq!(failed.outcome, Outcome::Failed);
    assert!(failed.error_message.as_deref().unwrap().contains("backup failed"));
    assert!(target.exists());
    assert_eq!(op(&report, "src/orphan.css").outcome, Outcome::Applied);
}

#[test]
fn test_manifest_write_failure_fails_dependency_operations() {
    let (_temp_dir, ctx) = setup();
    let manifest_path = ctx.project_root.join("package.json");
    let before = fs::read(&manifest_path).unwrap();
    let fs = FaultyFs::new().failing_write();
    let json = r#"{"unused_dependency": [
        {"path": "lodash", "relatedPath": "dependency"},
        {"path": "left-pad", "relatedPath": "dependency"}
    ]}"#;

    let report = run_with(&fs, &ctx, RunMode::Apply, json).unwrap();

    let lodash = op(&report, "lodash");
    assert_eq!(lodash.outcome, Outcome::Failed);
    assert!(lodash.error_message.as_deref().unwrap().contains("rewrite"));
    // Nothing to remove, so nothing to fail.
    assert_eq!(op(&report, "left-pad").outcome, Outcome::Applied);
    assert_eq!(fs::read(&manifest_path).unwrap(), before);
}

#[test]
fn test_unreadable_manifest_is_structural() {
    let (_temp_dir, ctx) = setup();
    fs::write(ctx.project_root.join("package.json"), "{ broken").unwrap();
    let json = r#"{"unused_dependency": [{"path": "lodash"}]}"#;

    let err = run_with(&RealFs, &ctx, RunMode::DryRun, json).unwrap_err();
    assert!(matches!(err, SweepError::ManifestError(_)));
}

#[test]
fn test_broken_manifest_aborts_before_files_are_removed() {
    let (_temp_dir, ctx) = setup();
    fs::write(ctx.project_root.join("package.json"), "{ broken").unwrap();

    let err = run_with(&RealFs, &ctx, RunMode::Apply, ALL_CATEGORIES).unwrap_err();

    assert!(matches!(err, SweepError::ManifestError(_)));
    assert!(ctx.project_root.join("old/util.js").exists());
    assert!(!ctx.state_dir.exists());
}

#[test]
fn test_missing_manifest_is_structural() {
    let (_temp_dir, ctx) = setup();
    fs::remove_file(ctx.project_root.join("package.json")).unwrap();
    let json = r#"{"unused_dependency": [{"path": "lodash"}]}"#;

    let err = run_with(&RealFs, &ctx, RunMode::Apply, json).unwrap_err();
    assert!(matches!(err, SweepError::ManifestError(_)));
}

#[test]
fn test_manifest_not_read_without_dependency_candidates() {
    let (_temp_dir, ctx) = setup();
    fs::write(ctx.project_root.join("package.json"), "{ broken").unwrap();
    let json = r#"{"dead_file": [{"path": "old/util.js"}]}"#;

    assert!(run_with(&RealFs, &ctx, RunMode::Apply, json).is_ok());
}

#[test]
fn test_uncreatable_backup_root_is_structural() {
    let (_temp_dir, ctx) = setup();
    let fs = FaultyFs::new().failing_create_dir();
    let json = r#"{"dead_file": [{"path": "old/util.js"}]}"#;

    let err = run_with(&fs, &ctx, RunMode::Apply, json).unwrap_err();
    assert!(matches!(err, SweepError::BackupError(_)));
    assert!(ctx.project_root.join("old/util.js").exists());
}

#[test]
fn test_unsafe_paths_are_refused() {
    let (_temp_dir, ctx) = setup();
    write_file(&ctx.project_root, ".git/HEAD", "ref: refs/heads/main\n");
    write_file(&ctx.project_root, ".sweep/candidates.json", "{}");
    let json = r#"{"dead_file": [
        {"path": "../outside.js"},
        {"path": ".git/HEAD"},
        {"path": ".sweep/candidates.json"},
        {"path": "src"}
    ]}"#;

    let report = run(&ctx, RunMode::Apply, json);

    assert_eq!(report.operations.len(), 4);
    assert!(
        report
            .operations
            .iter()
            .all(|o| o.outcome == Outcome::Failed && o.error_message.is_some())
    );
    assert!(ctx.project_root.join(".git/HEAD").exists());
    assert!(ctx.project_root.join("src").is_dir());
    assert!(report.rollback_manifest.is_none());
}

#[test]
fn test_apply_without_actionable_candidates_keeps_previous_manifest() {
    let (_temp_dir, ctx) = setup();
    run(
        &ctx,
        RunMode::Apply,
        r#"{"dead_file": [{"path": "old/util.js"}]}"#,
    );
    let first = fs::read(ctx.rollback_manifest_path()).unwrap();

    let report = run(
        &ctx,
        RunMode::Apply,
        r#"{"dead_file": [{"path": "old/util.js"}]}"#,
    );

    assert!(report.operations.is_empty());
    assert!(report.rollback_manifest.is_none());
    assert_eq!(fs::read(ctx.rollback_manifest_path()).unwrap(), first);
    assert!(ctx.backup_root.join("old/util.js").exists());
}

#[test]
fn test_new_apply_run_replaces_backup_generation() {
    let (_temp_dir, ctx) = setup();
    run(
        &ctx,
        RunMode::Apply,
        r#"{"dead_file": [{"path": "old/util.js"}]}"#,
    );

    run(
        &ctx,
        RunMode::Apply,
        r#"{"orphaned_file": [{"path": "src/orphan.css"}]}"#,
    );

    assert!(!ctx.backup_root.join("old/util.js").exists());
    assert!(ctx.backup_root.join("src/orphan.css").exists());
    let manifest = RollbackManifest::load(&ctx.rollback_manifest_path()).unwrap();
    let targets: Vec<_> = manifest.operations.iter().map(|o| o.target.as_str()).collect();
    assert_eq!(targets, vec!["src/orphan.css"]);
    assert_eq!(manifest.vcs_revision.as_deref(), Some("deadbeef"));
}

#[test]
fn test_operations_follow_category_order() {
    let (_temp_dir, ctx) = setup();

    let report = run(&ctx, RunMode::DryRun, ALL_CATEGORIES);

    let targets: Vec<_> = report.operations.iter().map(|o| o.target.as_str()).collect();
    assert_eq!(
        targets,
        vec!["old/util.js", "src/orphan.css", "src/b.js", "lodash"]
    );
}
