//! Default values for `Config` fields.

/// Default candidates document, relative to the project root.
pub fn default_candidates_file() -> String {
    ".sweep/candidates.json".to_string()
}

/// Default dependency manifest, relative to the project root.
pub fn default_dependency_manifest() -> String {
    "package.json".to_string()
}

/// Paths that are never removed, whatever the candidate list says.
pub fn default_protected_paths() -> Vec<String> {
    vec![".git/**".to_string()]
}

pub fn default_true() -> bool {
    true
}
