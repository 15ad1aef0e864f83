//! Staging index for Pit.
//!
//! Holds the ordered list of files staged for the next commit, persists it
//! as a structured JSON document, and reconciles the working tree against
//! the index and the last commit to produce a status report.
//!
//! # Key Types
//!
//! - [`StagingIndex`] -- The ordered staging area (insertion order preserved)
//! - [`IndexEntry`] -- A staged `(path, object id)` pair
//! - [`StatusReport`] -- Result of status reconciliation
//! - [`FileStatus`] -- Label of a reported file (Modified, Staged, Untracked)

pub mod entry;
pub mod error;
pub mod index;
pub mod status;

pub use entry::{normalize_path, IndexEntry};
pub use error::{IndexError, IndexResult};
pub use index::{StagingIndex, INDEX_VERSION};
pub use status::{reconcile, FileStatus, StatusEntry, StatusReport};
