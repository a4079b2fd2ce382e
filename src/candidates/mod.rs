//! Removal candidates: the input contract of the removal engine.
//!
//! Candidates are produced by an external scanner as a JSON document with one
//! array per category:
//!
//! ```json
//! {
//!   "dead_file":         [{"path": "old/util.js", "reason": "unused", "size": 120}],
//!   "orphaned_file":     [],
//!   "duplicate_file":    [{"path": "src/b.js", "relatedPath": "src/a.js"}],
//!   "unused_dependency": [{"path": "lodash", "relatedPath": "dependency"}]
//! }
//! ```
//!
//! Loading converts the loose document into typed [`RemovalCandidate`]s so the
//! engine can match on [`CandidateKind`] exhaustively. Malformed entries are
//! structural input errors. Paths are not deduplicated; the scanner guarantees
//! uniqueness within a batch.

mod types;


pub use types::{
    CandidateDocument, CandidateEntry, CandidateKind, Category, DependencyGroup,
    RemovalCandidate,
};

use crate::error::{Result, SweepError};
use std::path::Path;

/// A validated batch of candidates, ordered by category then list order.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    candidates: Vec<RemovalCandidate>,
}

impl CandidateSet {
    /// Build a set from already-typed candidates.
    ///
    /// Candidates are stably regrouped into processing order.
    pub fn new(mut candidates: Vec<RemovalCandidate>) -> Self {
        candidates.sort_by_key(|c| c.category() as u8);
        Self { candidates }
    }

    /// Load and validate a candidates document from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SweepError::InputError(format!(
                "candidates file not found: {}\n\nRun the candidate scanner first or pass --candidates <FILE>.",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            SweepError::InputError(format!(
                "failed to read candidates file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_json(&content)
    }

    /// Parse and validate a candidates document.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: CandidateDocument = serde_json::from_str(json).map_err(|e| {
            SweepError::InputError(format!("failed to parse candidates JSON: {}", e))
        })?;

        Self::from_document(document)
    }

    /// Convert a loose document into typed candidates.
    pub fn from_document(document: CandidateDocument) -> Result<Self> {
        let mut candidates = Vec::new();

        let groups = [
            (Category::DeadFile, document.dead_file),
            (Category::OrphanedFile, document.orphaned_file),
            (Category::DuplicateFile, document.duplicate_file),
            (Category::UnusedDependency, document.unused_dependency),
        ];

        for (category, entries) in groups {
            for (index, entry) in entries.into_iter().enumerate() {
                candidates.push(convert_entry(category, index, entry)?);
            }
        }

        Ok(Self::new(candidates))
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// All candidates in processing order.
    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &RemovalCandidate> {
        self.candidates.iter()
    }

    /// Candidates of one category, in list order.
    pub fn of_category(&self, category: Category) -> impl Iterator<Item = &RemovalCandidate> {
        self.candidates
            .iter()
            .filter(move |c| c.category() == category)
    }

    /// Number of candidates in one category.
    pub fn count(&self, category: Category) -> usize {
        self.of_category(category).count()
    }
}

fn convert_entry(category: Category, index: usize, entry: CandidateEntry) -> Result<RemovalCandidate> {
    let path = entry.path.trim().to_string();
    if path.is_empty() {
        return Err(SweepError::InputError(format!(
            "{} entry #{} has an empty path",
            category, index
        )));
    }

    let reason = entry
        .reason
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| category.to_string());

    let kind = match category {
        Category::DeadFile => CandidateKind::DeadFile,
        Category::OrphanedFile => CandidateKind::OrphanedFile,
        Category::DuplicateFile => {
            let original = entry
                .related_path
                .filter(|p| !p.trim().is_empty())
                .ok_or_else(|| {
                    SweepError::InputError(format!(
                        "duplicate_file candidate '{}' is missing relatedPath (the retained original)",
                        path
                    ))
                })?;
            if original == path {
                return Err(SweepError::InputError(format!(
                    "duplicate_file candidate '{}' names itself as the original",
                    path
                )));
            }
            CandidateKind::DuplicateFile { original }
        }
        Category::UnusedDependency => {
            let group = match entry.related_path.as_deref() {
                None | Some("") => None,
                Some(label) => Some(DependencyGroup::parse(label).ok_or_else(|| {
                    SweepError::InputError(format!(
                        "unused_dependency candidate '{}' has unknown dependency group '{}'",
                        path, label
                    ))
                })?),
            };
            CandidateKind::UnusedDependency { group }
        }
    };

    let size = if category == Category::UnusedDependency {
        0
    } else {
        entry.size
    };

    Ok(RemovalCandidate {
        path,
        reason,
        size,
        kind,
    })
}
