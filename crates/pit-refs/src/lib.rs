//! HEAD reference management for Pit.
//!
//! A Pit repository has a single reference, `HEAD`, naming the most recent
//! commit. It is empty until the first commit and only ever moves forward,
//! to a commit whose parent is the previous head.
//!
//! # Modules
//!
//! - [`error`] -- Error types for ref operations
//! - [`traits`] -- The [`HeadStore`] trait defining the storage interface
//! - [`fs`] -- [`FsHeadStore`], the `HEAD` text file
//! - [`memory`] -- In-memory [`InMemoryHeadStore`] for tests

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use error::{RefError, Result};
pub use fs::FsHeadStore;
pub use memory::InMemoryHeadStore;
pub use traits::HeadStore;
