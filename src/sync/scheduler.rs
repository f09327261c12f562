//! Periodic run loop around the sync engine.
//!
//! One pass at a time: the next cycle never starts before the previous
//! `run_once` returns. The wait between cycles is an async sleep, so
//! dropping the `run` future (e.g. racing it against a ctrl-c signal)
//! stops the loop cleanly between passes.

use std::sync::Arc;
use std::time::Duration;

use crate::logger::Logger;
use crate::sync::engine::SyncEngine;

/// Runs the engine forever on a fixed interval. Pass failures are
/// already absorbed inside `run_once`; nothing terminates the loop from
/// within.
pub struct SyncScheduler {
    engine: Arc<SyncEngine>,
    interval: Duration,
    logger: Arc<Logger>,
}

impl SyncScheduler {
    pub fn new(engine: Arc<SyncEngine>, interval: Duration, logger: Arc<Logger>) -> Self {
        Self {
            engine,
            interval,
            logger,
        }
    }

    /// Loop forever: pass, sleep, pass. The blocking filesystem work runs
    /// on the blocking thread pool so the sleep (and any signal racing
    /// this future) stays responsive.
    pub async fn run(&self) {
        loop {
            let engine = Arc::clone(&self.engine);
            match tokio::task::spawn_blocking(move || engine.run_once()).await {
                Ok(_result) => {
                    // Per-cycle marker, in addition to the engine's own
                    // pass summary line.
                    self.logger.log("Synchronization completed.");
                }
                Err(err) => {
                    // A panicking pass is a bug, but it must not take the
                    // scheduler down with it.
                    self.logger
                        .log(&format!("Synchronization pass aborted: {}", err));
                }
            }

            tokio::time::sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncConfig;
    use crate::sync::fingerprint::FingerprintAlgorithm;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_loop_repeats_and_is_cancellable() {
        let root = tempdir().unwrap();
        let source = root.path().join("source");
        let replica = root.path().join("replica");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::write(source.join("a.txt"), b"one").unwrap();

        let logger = Arc::new(Logger::new(&root.path().join("sync.log")).unwrap());
        let engine = Arc::new(
            SyncEngine::new(
                source.clone(),
                replica.clone(),
                &SyncConfig::default(),
                FingerprintAlgorithm::Blake3,
                Arc::clone(&logger),
            )
            .unwrap(),
        );
        let scheduler = SyncScheduler::new(engine, Duration::from_millis(20), logger);

        // The loop never returns on its own; cancel it from outside.
        let outcome =
            tokio::time::timeout(Duration::from_millis(500), scheduler.run()).await;
        assert!(outcome.is_err());

        // At least one pass ran and converged the replica.
        assert_eq!(std::fs::read(replica.join("a.txt")).unwrap(), b"one");

        // Multiple summary lines prove the loop cycled more than once,
        // and each cycle appends its own completion marker.
        let log = std::fs::read_to_string(root.path().join("sync.log")).unwrap();
        let summaries = log
            .lines()
            .filter(|l| l.contains("Synchronization completed in"))
            .count();
        let cycle_markers = log
            .lines()
            .filter(|l| l.ends_with(" - Synchronization completed."))
            .count();
        assert!(summaries >= 2, "expected repeated passes, got {}", summaries);
        assert!(
            cycle_markers >= 2,
            "expected per-cycle completion lines, got {}",
            cycle_markers
        );
    }
}
