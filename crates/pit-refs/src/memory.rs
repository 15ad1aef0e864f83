//! In-memory head store for testing and ephemeral use.

use std::sync::RwLock;

use pit_types::ObjectId;

use crate::error::Result;
use crate::traits::HeadStore;

/// An in-memory implementation of [`HeadStore`].
///
/// Data is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryHeadStore {
    head: RwLock<Option<ObjectId>>,
}

impl InMemoryHeadStore {
    /// Create a store with no head.
    pub fn new() -> Self {
        Self::default()
    }
}

impl HeadStore for InMemoryHeadStore {
    fn read_head(&self) -> Result<Option<ObjectId>> {
        Ok(*self.head.read().expect("lock poisoned"))
    }

    fn write_head(&self, id: &ObjectId) -> Result<()> {
        *self.head.write().expect("lock poisoned") = Some(*id);
        Ok(())
    }
}
