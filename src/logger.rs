//! Timestamped event log.
//!
//! Every event is a single `"<local timestamp> - <message>"` line,
//! appended to a log file and mirrored to the console.

use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Appends timestamped message lines to a durable file and stdout.
///
/// Shared across the engine and scheduler behind an `Arc`; the file
/// handle is mutex-guarded so log lines from different call sites never
/// interleave.
pub struct Logger {
    file: Mutex<File>,
}

impl Logger {
    /// Open (or create) the log file in append mode, creating missing
    /// parent directories.
    pub fn new(log_path: &Path) -> Result<Self> {
        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory: {}", parent.display())
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Append one timestamped line to the file and mirror it to stdout.
    ///
    /// Logging failures are swallowed: a full disk must not turn into a
    /// pass failure.
    pub fn log(&self, message: &str) {
        let entry = format!("{} - {}", Local::now().format("%Y-%m-%d %H:%M:%S"), message);
        println!("{}", entry);

        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{}", entry);
        }
    }
}
