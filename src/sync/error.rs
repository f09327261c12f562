// Per-file error taxonomy for sync operations
// A SyncError is always scoped to a single file; the engine logs it and
// moves on to the next entry.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Failure affecting a single file within a pass.
#[derive(Debug)]
pub enum SyncError {
    /// Reading a source or replica file failed (vanished between
    /// enumeration and fingerprinting, permissions, I/O).
    ReadFailure { path: PathBuf, source: io::Error },

    /// Writing or deleting on the replica side failed.
    WriteFailure { path: PathBuf, source: io::Error },

    /// A traversal entry could not be enumerated.
    WalkFailure { detail: String },
}

impl SyncError {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SyncError::ReadFailure {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SyncError::WriteFailure {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SyncError::ReadFailure { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            SyncError::WriteFailure { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
            SyncError::WalkFailure { detail } => {
                write!(f, "Failed to enumerate directory entry: {}", detail)
            }
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::ReadFailure { source, .. } => Some(source),
            SyncError::WriteFailure { source, .. } => Some(source),
            SyncError::WalkFailure { .. } => None,
        }
    }
}
