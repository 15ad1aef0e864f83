use std::collections::HashMap;
use std::sync::RwLock;

use pit_types::ObjectId;

use crate::error::StoreResult;
use crate::traits::{address_of, ObjectStore};

/// Object store kept entirely in memory. Backs the chain and index tests.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<ObjectId, Vec<u8>>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct objects held.
    pub fn object_count(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Drop an object, leaving dangling references to it. Returns `false`
    /// if it was not present.
    pub fn remove(&self, id: &ObjectId) -> bool {
        self.objects
            .write()
            .expect("lock poisoned")
            .remove(id)
            .is_some()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.objects.read().expect("lock poisoned").get(id).cloned())
    }

    fn put(&self, content: &[u8]) -> StoreResult<ObjectId> {
        let id = address_of(content);
        self.objects
            .write()
            .expect("lock poisoned")
            .entry(id)
            .or_insert_with(|| content.to_vec());
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.objects.read().expect("lock poisoned").contains_key(id))
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("objects", &self.object_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn stored_blob_reads_back() {
        let store = InMemoryObjectStore::new();
        let id = store.put(b"hello world").unwrap();
        assert_eq!(id, address_of(b"hello world"));
        assert_eq!(store.get(&id).unwrap(), b"hello world");
    }

    #[test]
    fn absent_object() {
        let store = InMemoryObjectStore::new();
        let id = address_of(b"missing");
        assert!(store.read(&id).unwrap().is_none());
        assert!(!store.exists(&id).unwrap());
        assert!(matches!(store.get(&id), Err(StoreError::NotFound(missing)) if missing == id));
    }

    #[test]
    fn identical_content_is_kept_once() {
        let store = InMemoryObjectStore::new();
        store.put(b"a.txt contents").unwrap();
        store.put(b"a.txt contents").unwrap();
        store.put(b"b.txt contents").unwrap();
        assert_eq!(store.object_count(), 2);
    }

    #[test]
    fn removed_object_leaves_a_dangling_address() {
        let store = InMemoryObjectStore::new();
        let id = store.put(b"commit body").unwrap();
        assert!(store.remove(&id));
        assert!(!store.exists(&id).unwrap());
        assert!(!store.remove(&id));
        assert_eq!(store.object_count(), 0);
    }
}
