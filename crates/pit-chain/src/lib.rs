//! Append-only commit history for Pit.
//!
//! This crate provides:
//! - [`Commit`], the serialized record sealing a staged file set
//! - [`CommitChain`], which creates commits, advances `HEAD`, and clears the
//!   staging index
//! - [`History`], a lazy newest-first walk along parent links
//!
//! Commits are stored in the same object store as file blobs, so a commit's
//! address is the hash of its serialized bytes and every read re-verifies it.

pub mod chain;
pub mod commit;
pub mod error;

pub use chain::{CommitChain, History};
pub use commit::Commit;
pub use error::{ChainError, ChainResult};
