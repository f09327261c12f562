//! File transfer onto the replica tree.
//!
//! Copies are staged in a temporary file next to the destination and
//! renamed into place, so a reader of the replica never observes a
//! half-written file and an interrupted copy leaves the previous
//! destination intact.

use filetime::FileTime;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::sync::error::SyncError;

/// Copy buffer size; memory use is independent of file size.
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Copies single files from the source tree onto the replica tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTransfer;

impl FileTransfer {
    pub fn new() -> Self {
        Self
    }

    /// Copy `source` to `dest`, creating missing parent directories and
    /// replacing any existing destination. The source mtime is carried
    /// over so external diff tooling sees stable timestamps.
    pub fn copy(&self, source: &Path, dest: &Path) -> Result<(), SyncError> {
        let parent = dest.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).map_err(|e| SyncError::write(parent, e))?;

        let mut reader = File::open(source).map_err(|e| SyncError::read(source, e))?;
        let source_mtime = reader
            .metadata()
            .map(|m| FileTime::from_last_modification_time(&m))
            .map_err(|e| SyncError::read(source, e))?;

        let mut staged = NamedTempFile::new_in(parent).map_err(|e| SyncError::write(dest, e))?;

        let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
        loop {
            let bytes_read = reader.read(&mut buffer).map_err(|e| SyncError::read(source, e))?;
            if bytes_read == 0 {
                break;
            }
            staged
                .write_all(&buffer[..bytes_read])
                .map_err(|e| SyncError::write(dest, e))?;
        }
        staged.flush().map_err(|e| SyncError::write(dest, e))?;

        // Atomic replace: the destination is either the old content or
        // the complete new content, never a truncated mix.
        staged
            .persist(dest)
            .map_err(|e| SyncError::write(dest, e.error))?;

        filetime::set_file_mtime(dest, source_mtime).map_err(|e| SyncError::write(dest, e))?;

        Ok(())
    }
}
