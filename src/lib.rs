// Library crate for replisync
// Re-exports modules for use in integration tests and the binary

pub mod config;
pub mod logger;
pub mod sync;

pub use config::SyncConfig;
pub use logger::Logger;
pub use sync::{
    ChangeDetector, ExclusionMatcher, FileTransfer, FingerprintAlgorithm, SyncEngine, SyncError,
    SyncResult, SyncScheduler,
};
