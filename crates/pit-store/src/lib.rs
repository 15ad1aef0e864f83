//! Content-addressed object storage for Pit.
//!
//! This crate implements a hash-keyed object store analogous to git's
//! `.git/objects/` directory. File snapshots and serialized commits are both
//! stored as immutable byte strings identified by their
//! [`ContentHasher::OBJECT`](pit_crypto::ContentHasher::OBJECT) address.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`FsObjectStore`] -- one file per object under `objects/<hex>`
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. Writing an object that already exists is a no-op returning the same ID.
//! 3. Reads re-hash the bytes; a mismatch is reported, never returned as data.
//! 4. The store never interprets object contents -- it is a pure key-value store.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use fs::{write_atomic, FsObjectStore};
pub use memory::InMemoryObjectStore;
pub use traits::{address_of, ObjectStore};
