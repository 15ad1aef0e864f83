//! The [`HeadStore`] trait defining the reference storage interface.

use pit_types::ObjectId;

use crate::error::Result;

/// Storage backend for the `HEAD` reference.
///
/// Implementations must be thread-safe (`Send + Sync`). `write_head` must be
/// atomic: a concurrent reader sees either the old head or the new one.
pub trait HeadStore: Send + Sync {
    /// Read the current head.
    ///
    /// Returns `Ok(None)` before the first commit.
    fn read_head(&self) -> Result<Option<ObjectId>>;

    /// Point HEAD at `id`.
    fn write_head(&self, id: &ObjectId) -> Result<()>;
}
