//! Exclusion pattern matching for sync passes.
//!
//! Two independent rule sets, applied to paths relative to a tree root:
//!
//! - file patterns: shell-style wildcards (`*` = any run, `?` = one
//!   character), matched case-insensitively against the base filename
//!   only, anchored to the full name;
//! - directory patterns: exact segment names, matched case-sensitively
//!   against every component of the relative path.

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Component, Path};

use crate::config::SyncConfig;

/// Compiled exclusion rules. Pure and deterministic, so the copy and
/// delete phases can each consult it independently.
#[derive(Debug, Clone)]
pub struct ExclusionMatcher {
    /// Compiled glob set for filename matching.
    file_globs: GlobSet,
    /// Exact directory segment names.
    dir_names: Vec<String>,
}

impl ExclusionMatcher {
    /// Compile the matcher from an exclusion config.
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();

        for pattern in &config.exclude_files {
            let glob = GlobBuilder::new(&escape_non_wildcards(pattern))
                .case_insensitive(true)
                .backslash_escape(true)
                .build()
                .with_context(|| format!("Invalid exclusion pattern: {}", pattern))?;
            builder.add(glob);
        }

        Ok(Self {
            file_globs: builder.build()?,
            dir_names: config.exclude_directories.clone(),
        })
    }

    /// Decide whether a path relative to a tree root is excluded.
    ///
    /// Directories are excluded when any segment equals a configured
    /// directory name exactly. Files are excluded when the base name
    /// matches any file pattern.
    pub fn is_excluded(&self, relative: &Path, is_directory: bool) -> bool {
        if is_directory {
            return relative.components().any(|component| {
                matches!(component, Component::Normal(name)
                    if self.dir_names.iter().any(|d| name == d.as_str()))
            });
        }

        match relative.file_name() {
            Some(name) => self.file_globs.is_match(Path::new(name)),
            None => false,
        }
    }
}

/// Escape glob metacharacters other than `*` and `?`, so patterns only
/// carry the two wildcards the config format defines.
fn escape_non_wildcards(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    for ch in pattern.chars() {
        match ch {
            '[' | ']' | '{' | '}' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}
