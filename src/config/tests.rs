//! Tests for config functionality.

use crate::config::Config;
use crate::error::SweepError;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.candidates_file, ".sweep/candidates.json");
    assert_eq!(config.dependency_manifest, "package.json");
    assert_eq!(config.protected_paths, vec![".git/**".to_string()]);
    assert!(config.record_vcs_revision);
    assert!(config.log_events);
}

#[test]
fn test_parse_empty_yaml() {
    let config = Config::from_yaml("").unwrap();
    assert_eq!(config.dependency_manifest, "package.json");
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
dependency_manifest: web/package.json
log_events: false
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.dependency_manifest, "web/package.json");
    assert!(!config.log_events);
    assert_eq!(config.candidates_file, ".sweep/candidates.json");
    assert!(config.record_vcs_revision);
}

#[test]
fn test_unknown_fields_are_ignored() {
    let yaml = r#"
future_option: 42
protected_paths:
  - "src/main.js"
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.protected_paths, vec!["src/main.js".to_string()]);
}

#[test]
fn test_invalid_yaml_is_user_error() {
    let err = Config::from_yaml("protected_paths: [unclosed").unwrap_err();
    assert!(matches!(err, SweepError::UserError(_)));
}

#[test]
fn test_rejects_manifest_outside_project() {
    let err = Config::from_yaml("dependency_manifest: ../package.json").unwrap_err();
    assert!(err.to_string().contains("dependency_manifest"));

    assert!(Config::from_yaml("dependency_manifest: /etc/package.json").is_err());
}

#[test]
fn test_rejects_empty_candidates_file() {
    assert!(Config::from_yaml("candidates_file: \"\"").is_err());
}

#[test]
fn test_rejects_invalid_glob() {
    let err = Config::from_yaml("protected_paths: [\"src/[\"]").unwrap_err();
    assert!(err.to_string().contains("protected_paths"));
}

#[test]
fn test_protected_globs_match() {
    let config = Config::from_yaml("protected_paths: [\".git/**\", \"**/*.lock\"]").unwrap();
    let globs = config.protected_globs().unwrap();

    assert!(globs.is_match(".git/config"));
    assert!(globs.is_match("deps/yarn.lock"));
    assert!(!globs.is_match("src/a.js"));
}

#[test]
fn test_flags_can_be_disabled() {
    let config = Config::from_yaml("record_vcs_revision: false\nlog_events: false\n").unwrap();
    assert!(!config.record_vcs_revision);
    assert!(!config.log_events);
}

#[test]
fn test_load_or_default_without_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::load_or_default(temp_dir.path().join("config.yaml")).unwrap();
    assert_eq!(config.dependency_manifest, "package.json");
}

#[test]
fn test_load_or_default_with_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");
    std::fs::write(&path, "candidates_file: scan.json\n").unwrap();

    let config = Config::load_or_default(&path).unwrap();
    assert_eq!(config.candidates_file, "scan.json");
}
