//! Foundation types for Pit.
//!
//! This crate provides the identifier type shared by every other Pit crate.
//!
//! # Key Types
//!
//! - [`ObjectId`] -- Content address of a stored object (BLAKE3 hash)
//! - [`TypeError`] -- Parse failures for textual addresses

pub mod error;
pub mod object;

pub use error::TypeError;
pub use object::ObjectId;
