//! Synchronization engine for one-way mirroring.
//!
//! One pass is two strictly ordered phases over real filesystem state:
//! first every non-excluded source file is copied to the replica when its
//! content differs (or it is missing), then every replica file without a
//! source counterpart is deleted. Per-file failures are logged and
//! skipped. A failure to enumerate the source tree aborts the whole pass
//! before the delete phase runs: an unenumerable source must never look
//! like an empty one, or the delete phase would wipe the replica. The
//! abort is caught at the `run_once` boundary so the scheduler loop
//! survives any pass.

use anyhow::{Context, Result};
use jwalk::WalkDir;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::SyncConfig;
use crate::logger::Logger;
use crate::sync::error::SyncError;
use crate::sync::exclude::ExclusionMatcher;
use crate::sync::fingerprint::{ChangeDetector, FingerprintAlgorithm};
use crate::sync::transfer::FileTransfer;

/// Outcome of one pass. Ephemeral: produced, logged, dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncResult {
    /// Files copied or updated in the copy phase.
    pub copied: usize,
    /// Files deleted in the delete phase.
    pub deleted: usize,
    /// Wall-clock duration of the pass.
    pub elapsed: Duration,
}

/// Orchestrates one full synchronization pass over source and replica.
pub struct SyncEngine {
    /// Authoritative tree being mirrored from.
    source: PathBuf,
    /// Subordinate tree being mirrored onto.
    replica: PathBuf,
    matcher: ExclusionMatcher,
    detector: ChangeDetector,
    transfer: FileTransfer,
    logger: Arc<Logger>,
}

impl SyncEngine {
    /// Build an engine with all collaborators resolved up front; no
    /// ambient state is consulted after construction.
    pub fn new(
        source: PathBuf,
        replica: PathBuf,
        config: &SyncConfig,
        algorithm: FingerprintAlgorithm,
        logger: Arc<Logger>,
    ) -> Result<Self> {
        let matcher = ExclusionMatcher::new(config)?;

        Ok(Self {
            source,
            replica,
            matcher,
            detector: ChangeDetector::new(algorithm),
            transfer: FileTransfer::new(),
            logger,
        })
    }

    /// Run one complete pass and log its summary line.
    ///
    /// Never propagates an error: a pass-level failure is logged with the
    /// elapsed time and yields a zeroed result, so callers can always run
    /// this inside a timed loop.
    pub fn run_once(&self) -> SyncResult {
        let started = Instant::now();

        match self.run_pass() {
            Ok((copied, deleted)) => {
                let elapsed = started.elapsed();
                self.logger.log(&format!(
                    "Synchronization completed in {:.2} seconds. Files copied/updated: {}, files deleted: {}.",
                    elapsed.as_secs_f64(),
                    copied,
                    deleted
                ));
                SyncResult {
                    copied,
                    deleted,
                    elapsed,
                }
            }
            Err(err) => {
                let elapsed = started.elapsed();
                self.logger.log(&format!(
                    "Error during synchronization after {:.2} seconds: {:#}",
                    elapsed.as_secs_f64(),
                    err
                ));
                SyncResult {
                    copied: 0,
                    deleted: 0,
                    elapsed,
                }
            }
        }
    }

    /// Copy phase strictly before delete phase. The ordering guarantees
    /// that a file copied under an exclusion rule that changed mid-run is
    /// still subject to this pass's deletions.
    fn run_pass(&self) -> Result<(usize, usize)> {
        // A vanished or unreadable source root is a pass failure, never
        // an empty source: files the pass could not see must not be
        // deleted from the replica.
        if !self.source.is_dir() {
            anyhow::bail!(
                "Source directory not accessible: {}",
                self.source.display()
            );
        }

        std::fs::create_dir_all(&self.replica).with_context(|| {
            format!(
                "Failed to create replica directory: {}",
                self.replica.display()
            )
        })?;

        let copied = self.copy_phase()?;
        let deleted = self.delete_phase();
        Ok((copied, deleted))
    }

    /// Walk the source tree and copy every non-excluded file whose
    /// content is missing or stale on the replica side.
    ///
    /// Per-file copy failures are absorbed; traversal failures are not.
    /// A subtree this phase could not enumerate would otherwise have its
    /// files deleted by the delete phase, so any walk error ends the
    /// pass.
    fn copy_phase(&self) -> Result<usize> {
        let mut copied = 0;

        for entry in walk(&self.source) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    return Err(SyncError::WalkFailure {
                        detail: err.to_string(),
                    }
                    .into());
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let source_path = entry.path();
            let relative = match source_path.strip_prefix(&self.source) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => continue,
            };

            if self.matcher.is_excluded(&relative, false) {
                continue;
            }
            // Directory exclusion overrides file-level decisions for
            // everything inside the excluded directory.
            if let Some(parent) = relative.parent() {
                if self.matcher.is_excluded(parent, true) {
                    continue;
                }
            }

            let replica_path = self.replica.join(&relative);
            match self.sync_file(&source_path, &replica_path) {
                Ok(true) => {
                    copied += 1;
                    self.logger
                        .log(&format!("Copied/Updated: {}", relative.display()));
                }
                Ok(false) => {}
                Err(err) => self.log_failure(&err),
            }
        }

        Ok(copied)
    }

    /// Detect-then-copy for a single file. Returns whether a copy was
    /// performed.
    fn sync_file(&self, source: &Path, replica: &Path) -> Result<bool, SyncError> {
        if !self.detector.needs_copy(source, replica)? {
            return Ok(false);
        }
        self.transfer.copy(source, replica)?;
        Ok(true)
    }

    /// Walk the replica tree and delete every non-excluded file that no
    /// longer exists under the source root.
    ///
    /// Replica walk errors stay per-entry: an entry this phase cannot
    /// see is merely left in place until a later pass.
    fn delete_phase(&self) -> usize {
        let mut deleted = 0;

        for entry in walk(&self.replica) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    self.log_failure(&SyncError::WalkFailure {
                        detail: err.to_string(),
                    });
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let replica_path = entry.path();
            let relative = match replica_path.strip_prefix(&self.replica) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => continue,
            };

            // Files matching an exclusion pattern are replica-local
            // artifacts; never delete them.
            if self.matcher.is_excluded(&relative, false) {
                continue;
            }

            if self.source.join(&relative).is_file() {
                continue;
            }

            match std::fs::remove_file(&replica_path) {
                Ok(()) => {
                    deleted += 1;
                    self.logger.log(&format!("Deleted: {}", relative.display()));
                }
                Err(err) => self.log_failure(&SyncError::write(&replica_path, err)),
            }
        }

        deleted
    }

    fn log_failure(&self, err: &SyncError) {
        self.logger.log(&err.to_string());
    }
}

/// Deterministic recursive walk: sorted, dotfiles included, symlinks not
/// followed (only regular files are mirrored).
fn walk(root: &Path) -> WalkDir {
    WalkDir::new(root)
        .sort(true)
        .skip_hidden(false)
        .follow_links(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn engine(source: &Path, replica: &Path, config: &SyncConfig) -> (SyncEngine, tempfile::TempDir) {
        let log_dir = tempdir().unwrap();
        let logger = Arc::new(Logger::new(&log_dir.path().join("sync.log")).unwrap());
        let engine = SyncEngine::new(
            source.to_path_buf(),
            replica.to_path_buf(),
            config,
            FingerprintAlgorithm::Blake3,
            logger,
        )
        .unwrap();
        (engine, log_dir)
    }

    #[test]
    fn test_single_pass_mirrors_source() {
        let root = tempdir().unwrap();
        let source = root.path().join("source");
        let replica = root.path().join("replica");
        std::fs::create_dir_all(source.join("nested")).unwrap();
        std::fs::write(source.join("a.txt"), b"alpha").unwrap();
        std::fs::write(source.join("nested").join("b.txt"), b"beta").unwrap();

        let (engine, _log) = engine(&source, &replica, &SyncConfig::default());
        let result = engine.run_once();

        assert_eq!(result.copied, 2);
        assert_eq!(result.deleted, 0);
        assert_eq!(std::fs::read(replica.join("a.txt")).unwrap(), b"alpha");
        assert_eq!(
            std::fs::read(replica.join("nested").join("b.txt")).unwrap(),
            b"beta"
        );
    }

    #[test]
    fn test_delete_phase_removes_orphans() {
        let root = tempdir().unwrap();
        let source = root.path().join("source");
        let replica = root.path().join("replica");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::create_dir_all(&replica).unwrap();
        std::fs::write(replica.join("stale.txt"), b"old").unwrap();

        let (engine, _log) = engine(&source, &replica, &SyncConfig::default());
        let result = engine.run_once();

        assert_eq!(result.deleted, 1);
        assert!(!replica.join("stale.txt").exists());
    }

    #[test]
    fn test_missing_source_root_fails_pass_and_preserves_replica() {
        let root = tempdir().unwrap();
        let source = root.path().join("never-created");
        let replica = root.path().join("replica");
        std::fs::create_dir_all(&replica).unwrap();
        std::fs::write(replica.join("a.txt"), b"keep me").unwrap();
        std::fs::write(replica.join("b.txt"), b"me too").unwrap();

        let (engine, log_dir) = engine(&source, &replica, &SyncConfig::default());
        let result = engine.run_once();

        // The pass fails before the delete phase; the replica is intact.
        assert_eq!(result.copied, 0);
        assert_eq!(result.deleted, 0);
        assert_eq!(std::fs::read(replica.join("a.txt")).unwrap(), b"keep me");
        assert_eq!(std::fs::read(replica.join("b.txt")).unwrap(), b"me too");

        let log = std::fs::read_to_string(log_dir.path().join("sync.log")).unwrap();
        assert!(log.contains("Error during synchronization after"));
        assert!(!log.contains("Synchronization completed"));
    }
}
