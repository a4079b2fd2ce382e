//! Candidate data types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four candidate categories, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    DeadFile,
    OrphanedFile,
    DuplicateFile,
    UnusedDependency,
}

impl Category {
    /// All categories in the order the engine processes them.
    pub const ALL: [Category; 4] = [
        Category::DeadFile,
        Category::OrphanedFile,
        Category::DuplicateFile,
        Category::UnusedDependency,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::DeadFile => write!(f, "dead_file"),
            Category::OrphanedFile => write!(f, "orphaned_file"),
            Category::DuplicateFile => write!(f, "duplicate_file"),
            Category::UnusedDependency => write!(f, "unused_dependency"),
        }
    }
}

/// Dependency section of the manifest a key is removed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyGroup {
    /// `dependencies`
    Production,
    /// `devDependencies`
    Development,
}

impl DependencyGroup {
    /// Parse the group label carried in a candidate's `relatedPath`.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "dependency" | "dependencies" | "production" | "prod" => Some(Self::Production),
            "devDependency" | "devDependencies" | "development" | "dev" => {
                Some(Self::Development)
            }
            _ => None,
        }
    }

    /// JSON key of this section in the manifest.
    pub fn manifest_key(&self) -> &'static str {
        match self {
            DependencyGroup::Production => "dependencies",
            DependencyGroup::Development => "devDependencies",
        }
    }

    /// Label recorded as the operation's `relatedPath`.
    pub fn label(&self) -> &'static str {
        match self {
            DependencyGroup::Production => "dependency",
            DependencyGroup::Development => "devDependency",
        }
    }
}

/// Category-specific data of a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateKind {
    DeadFile,
    OrphanedFile,
    /// `original` is the retained copy; it is never touched.
    DuplicateFile { original: String },
    /// `None` removes the key from whichever section holds it.
    UnusedDependency { group: Option<DependencyGroup> },
}

/// One thing that might be deleted. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalCandidate {
    /// Project-relative file path, or dependency name.
    pub path: String,
    pub reason: String,
    /// Size in bytes; 0 for dependencies.
    pub size: u64,
    pub kind: CandidateKind,
}

impl RemovalCandidate {
    pub fn category(&self) -> Category {
        match self.kind {
            CandidateKind::DeadFile => Category::DeadFile,
            CandidateKind::OrphanedFile => Category::OrphanedFile,
            CandidateKind::DuplicateFile { .. } => Category::DuplicateFile,
            CandidateKind::UnusedDependency { .. } => Category::UnusedDependency,
        }
    }

    /// The `relatedPath` value carried onto the operation.
    pub fn related_path(&self) -> Option<String> {
        match &self.kind {
            CandidateKind::DeadFile | CandidateKind::OrphanedFile => None,
            CandidateKind::DuplicateFile { original } => Some(original.clone()),
            CandidateKind::UnusedDependency { group } => group.map(|g| g.label().to_string()),
        }
    }

    /// True for the three file categories.
    pub fn is_file(&self) -> bool {
        !matches!(self.kind, CandidateKind::UnusedDependency { .. })
    }
}

/// Entry as it appears in the candidates document.
///
/// Aliases accept the field names emitted by the dead-file scanner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateEntry {
    #[serde(alias = "file", alias = "duplicate", alias = "name")]
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default)]
    pub size: u64,

    #[serde(
        default,
        alias = "original",
        alias = "type",
        skip_serializing_if = "Option::is_none"
    )]
    pub related_path: Option<String>,
}

/// The candidates document: one array per category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateDocument {
    #[serde(alias = "deadFiles")]
    pub dead_file: Vec<CandidateEntry>,

    #[serde(alias = "orphanedFiles")]
    pub orphaned_file: Vec<CandidateEntry>,

    #[serde(alias = "duplicateFiles")]
    pub duplicate_file: Vec<CandidateEntry>,

    #[serde(alias = "unusedDependencies")]
    pub unused_dependency: Vec<CandidateEntry>,
}
