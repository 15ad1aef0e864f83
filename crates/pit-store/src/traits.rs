use pit_crypto::ContentHasher;
use pit_types::ObjectId;

use crate::error::{StoreError, StoreResult};

/// Compute the address `content` would be stored under, without storing it.
pub fn address_of(content: &[u8]) -> ObjectId {
    ContentHasher::OBJECT.hash(content)
}

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written. The same bytes always produce the
///   same ID, so an existing object is never overwritten.
/// - `put` is idempotent: a second call with identical content stores
///   nothing and returns the same ID.
/// - The store never interprets object contents; it is a pure key-value store.
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Read an object by its content-addressed ID.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    /// Returns `Err` on I/O failure or data corruption.
    fn read(&self, id: &ObjectId) -> StoreResult<Option<Vec<u8>>>;

    /// Store `content` and return its content-addressed ID.
    ///
    /// If the object already exists, this is a no-op (idempotent).
    fn put(&self, content: &[u8]) -> StoreResult<ObjectId>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Read an object, failing with [`StoreError::NotFound`] when absent.
    fn get(&self, id: &ObjectId) -> StoreResult<Vec<u8>> {
        self.read(id)?.ok_or(StoreError::NotFound(*id))
    }
}
