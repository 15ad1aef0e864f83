//! High-level SDK for Pit.
//!
//! [`Repository`] is the entry point: it owns the paths of one repository
//! and wires the object store, staging index, `HEAD`, and commit chain
//! together behind the user-level operations (`init`, `stage_file`,
//! `commit`, `status`, `log`). Every operation reloads durable state from
//! `.pit/`, so separate `Repository` values over the same directory always
//! agree.

pub mod config;
pub mod error;
pub mod lock;
pub mod repository;
pub mod worktree;

pub use config::{IgnoreConfig, LockConfig, RepoConfig};
pub use error::{RepoError, RepoResult};
pub use lock::RepoLock;
pub use repository::{Repository, PIT_DIR};
pub use worktree::{FsWorkingTree, WorkingTree, IGNORE_FILE};

// Re-export key types
pub use pit_chain::{Commit, History};
pub use pit_index::{FileStatus, IndexEntry, StatusEntry, StatusReport};
pub use pit_types::ObjectId;
