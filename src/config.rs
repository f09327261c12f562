//! Exclusion configuration for sync runs.
//!
//! The config document is a small JSON file with two pattern lists:
//!
//! ```json
//! {
//!   "ExcludeFiles": ["*.log", "thumbs.db"],
//!   "ExcludeDirectories": [".git", "node_modules"]
//! }
//! ```
//!
//! File patterns are shell-style wildcards (`*`, `?`) matched
//! case-insensitively against base filenames. Directory patterns are exact
//! segment names. A missing config file means no exclusions.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Exclusion pattern lists, immutable for the duration of a run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SyncConfig {
    /// Filename wildcard patterns (`*`, `?`), case-insensitive.
    #[serde(alias = "exclude_files")]
    pub exclude_files: Vec<String>,
    /// Exact directory segment names, case-sensitive.
    #[serde(alias = "exclude_directories")]
    pub exclude_directories: Vec<String>,
}

impl SyncConfig {
    /// Load the config from a JSON file. A missing file yields an empty
    /// config; a present but malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Whether any exclusion pattern is configured.
    pub fn has_exclusions(&self) -> bool {
        !self.exclude_files.is_empty() || !self.exclude_directories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_missing_file() {
        let config = SyncConfig::load(Path::new("/nonexistent/syncconfig.json")).unwrap();
        assert!(config.exclude_files.is_empty());
        assert!(config.exclude_directories.is_empty());
        assert!(!config.has_exclusions());
    }

    #[test]
    fn test_load_pascal_case() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"ExcludeFiles": ["*.log"], "ExcludeDirectories": [".git"]}"#)
            .unwrap();

        let config = SyncConfig::load(file.path()).unwrap();
        assert_eq!(config.exclude_files, vec!["*.log"]);
        assert_eq!(config.exclude_directories, vec![".git"]);
        assert!(config.has_exclusions());
    }

    #[test]
    fn test_load_partial_document() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"ExcludeFiles": ["*.tmp"]}"#).unwrap();

        let config = SyncConfig::load(file.path()).unwrap();
        assert_eq!(config.exclude_files, vec!["*.tmp"]);
        assert!(config.exclude_directories.is_empty());
    }

    #[test]
    fn test_load_malformed_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();

        assert!(SyncConfig::load(file.path()).is_err());
    }
}
