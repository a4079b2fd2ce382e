//! Config loading, validation, and derived values.

use super::model::Config;
use crate::error::{Result, SweepError};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Component, Path};

impl Config {
    /// Load config from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            SweepError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config if the file exists, otherwise return defaults.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a mapping.
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml)
                .map_err(|e| SweepError::UserError(format!("failed to parse config YAML: {}", e)))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate config values.
    ///
    /// - `candidates_file` and `dependency_manifest` must be non-empty
    /// - `dependency_manifest` must be project-relative without `..`
    /// - every `protected_paths` entry must be a valid glob
    pub fn validate(&self) -> Result<()> {
        if self.candidates_file.trim().is_empty() {
            return Err(SweepError::UserError(
                "config validation failed: candidates_file must not be empty".to_string(),
            ));
        }

        if self.dependency_manifest.trim().is_empty() {
            return Err(SweepError::UserError(
                "config validation failed: dependency_manifest must not be empty".to_string(),
            ));
        }

        let manifest = Path::new(&self.dependency_manifest);
        if manifest.is_absolute()
            || manifest
                .components()
                .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(SweepError::UserError(format!(
                "config validation failed: dependency_manifest must be a relative path inside the project (found '{}')",
                self.dependency_manifest
            )));
        }

        self.protected_globs()?;
        Ok(())
    }

    /// Compile `protected_paths` into a matcher.
    pub fn protected_globs(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.protected_paths {
            let glob = Glob::new(pattern).map_err(|e| {
                SweepError::UserError(format!(
                    "config validation failed: invalid protected_paths glob '{}': {}",
                    pattern, e
                ))
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|e| {
            SweepError::UserError(format!(
                "config validation failed: failed to build protected_paths globs: {}",
                e
            ))
        })
    }
}
