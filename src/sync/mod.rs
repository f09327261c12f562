//! Core synchronization module.
//!
//! Leaf-first: exclusion matching, change detection and file transfer are
//! independent collaborators; the engine composes them into one pass and
//! the scheduler repeats passes on a fixed interval.

pub mod engine;
pub mod error;
pub mod exclude;
pub mod fingerprint;
pub mod scheduler;
pub mod transfer;

pub use engine::{SyncEngine, SyncResult};
pub use error::SyncError;
pub use exclude::ExclusionMatcher;
pub use fingerprint::{fingerprint_file, ChangeDetector, FingerprintAlgorithm};
pub use scheduler::SyncScheduler;
pub use transfer::FileTransfer;
