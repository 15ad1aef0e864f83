//! Content hashing for Pit.
//!
//! Every object address in a Pit repository is produced by a
//! [`ContentHasher`]. The hasher wraps BLAKE3; no custom cryptography.

pub mod hasher;

pub use hasher::ContentHasher;
