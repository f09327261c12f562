use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use replisync::config::SyncConfig;
use replisync::logger::Logger;
use replisync::sync::{FingerprintAlgorithm, SyncEngine, SyncScheduler};

/// Periodic one-way folder mirroring with exclusion patterns.
///
/// Makes REPLICA contain exactly the non-excluded files of SOURCE,
/// content-identical, once every INTERVAL_SECONDS. All actions are
/// logged to LOG_FILE and mirrored to the console.
#[derive(Parser, Debug)]
#[command(name = "replisync", version)]
struct Cli {
    /// Source directory (authoritative tree)
    source: PathBuf,

    /// Replica directory (created if missing)
    replica: PathBuf,

    /// Seconds between synchronization passes
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    interval_seconds: u64,

    /// Log file path
    log_file: PathBuf,

    /// Exclusion config (JSON); a missing file means no exclusions
    #[arg(long, default_value = "syncconfig.json")]
    config: PathBuf,

    /// Fingerprint algorithm: blake3 or md5
    #[arg(long, default_value = "blake3")]
    hash: FingerprintAlgorithm,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.source.is_dir() {
        bail!(
            "source path is not an existing directory: {}",
            cli.source.display()
        );
    }

    let config = SyncConfig::load(&cli.config)?;
    let logger = Arc::new(Logger::new(&cli.log_file)?);

    logger.log("Starting folder synchronization...");
    if config.has_exclusions() {
        logger.log("Exclusions loaded from config:");
        if !config.exclude_files.is_empty() {
            logger.log(&format!("  Excluded files: {}", config.exclude_files.join(", ")));
        }
        if !config.exclude_directories.is_empty() {
            logger.log(&format!(
                "  Excluded directories: {}",
                config.exclude_directories.join(", ")
            ));
        }
    }

    let engine = Arc::new(SyncEngine::new(
        cli.source,
        cli.replica,
        &config,
        cli.hash,
        Arc::clone(&logger),
    )?);
    let scheduler = SyncScheduler::new(
        engine,
        Duration::from_secs(cli.interval_seconds),
        Arc::clone(&logger),
    );

    // The loop only ends when the process is told to stop; cancellation
    // lands in the sleep between passes.
    tokio::select! {
        _ = scheduler.run() => {}
        _ = tokio::signal::ctrl_c() => {
            logger.log("Shutdown requested, stopping synchronization loop.");
        }
    }

    Ok(())
}
